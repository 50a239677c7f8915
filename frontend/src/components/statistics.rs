use crate::api;
use shared::HistoryStatistics;
use shared::api::format_file_size;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatisticsPanelProps {
    pub api_base: String,
}

#[derive(Clone, PartialEq)]
enum StatsState {
    Loading,
    Loaded(HistoryStatistics),
    Failed,
}

/// Request history aggregates with a refresh control and a link to the full report.
#[function_component(StatisticsPanel)]
pub fn statistics_panel(props: &StatisticsPanelProps) -> Html {
    let state = use_state(|| StatsState::Loading);
    let reload = use_state(|| 0u32);

    {
        let state = state.clone();
        let api_base = props.api_base.clone();
        use_effect_with(*reload, move |_| {
            state.set(StatsState::Loading);
            spawn_local(async move {
                match api::fetch_statistics(&api_base).await {
                    Ok(stats) => state.set(StatsState::Loaded(stats)),
                    Err(e) => {
                        log::error!("Failed to fetch statistics: {}", e);
                        state.set(StatsState::Failed);
                    }
                }
            });
            || ()
        });
    }

    let on_refresh = {
        let reload = reload.clone();
        Callback::from(move |_: MouseEvent| reload.set(reload.wrapping_add(1)))
    };

    let on_report = {
        let url = api::report_url(&props.api_base);
        Callback::from(move |_: MouseEvent| {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.open_with_url_and_target(&url, "_blank") {
                    log::error!("Failed to open report: {:?}", e);
                }
            }
        })
    };

    html! {
        <section class="statistics-panel">
            <div class="statistics-header">
                <h3>{"Usage statistics"}</h3>
                <button class="icon-btn" title="Refresh" onclick={on_refresh}>
                    <i class="fa-solid fa-rotate"></i>
                </button>
                <button class="icon-btn" title="Download report" onclick={on_report}>
                    <i class="fa-solid fa-file-arrow-down"></i>
                </button>
            </div>
            {
                match &*state {
                    StatsState::Loading => html! { <p class="muted">{"Loading statistics..."}</p> },
                    StatsState::Failed => html! { <p class="muted">{"Statistics are unavailable right now"}</p> },
                    StatsState::Loaded(stats) if stats.is_empty() => {
                        html! { <p class="muted">{"No requests recorded yet"}</p> }
                    }
                    StatsState::Loaded(stats) => render_statistics(stats),
                }
            }
        </section>
    }
}

fn render_statistics(stats: &HistoryStatistics) -> Html {
    html! {
        <div class="statistics-grid">
            <div class="stat-card">
                <h4>{"Model usage"}</h4>
                { for stats.model_usage.iter().map(|(family, versions)| html! {
                    <div class="stat-group">
                        <strong>{ family }</strong>
                        <ul>
                            { for versions.iter().map(|(version, share)| html! {
                                <li>{ format!("{}: {:.1}%", version, share) }</li>
                            })}
                        </ul>
                    </div>
                })}
            </div>
            <div class="stat-card">
                <h4>{"Average processing time"}</h4>
                <ul>
                    { for stats.avg_processing_time.iter().map(|(model, seconds)| html! {
                        <li>{ format!("{}: {:.1} s", model, seconds) }</li>
                    })}
                </ul>
            </div>
            <div class="stat-card">
                <h4>{"Average file size"}</h4>
                <ul>
                    { for stats.avg_file_size.iter().map(|(model, bytes)| html! {
                        <li>{ format!("{}: {}", model, format_file_size(*bytes)) }</li>
                    })}
                </ul>
            </div>
            <div class="stat-card">
                <h4>{"Success rate"}</h4>
                <p class="stat-value">{ format!("{:.1}%", stats.success_rate) }</p>
            </div>
            <div class="stat-card">
                <h4>{"Scale factors"}</h4>
                <ul>
                    { for stats.sorted_scale_factors().into_iter().map(|(scale, share)| html! {
                        <li>{ format!("x{}: {:.1}%", scale, share) }</li>
                    })}
                </ul>
            </div>
        </div>
    }
}
