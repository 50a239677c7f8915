use js_sys::Date;
use yew::prelude::*;

pub fn render_title() -> Html {
    html! {
        <section class="title-row">
            <h2>{"Improve your photos with artificial intelligence"}</h2>
            <p class="subtitle">
                {"Upload an image and the model will raise its resolution without losing quality. \
                  Supported formats: JPG, PNG, WEBP."}
            </p>
        </section>
    }
}

pub fn render_features() -> Html {
    let features = [
        ("fa-solid fa-arrow-up", "High quality", "Upscaling raises resolution and brings out detail."),
        ("fa-solid fa-rocket", "Fast processing", "Images are processed on dedicated hardware."),
        ("fa-solid fa-upload", "Many formats", "PNG, JPG, WEBP and other common formats are accepted."),
    ];

    html! {
        <section class="features-row">
            { for features.iter().map(|(icon, title, text)| html! {
                <div class="feature-card">
                    <div class="feature-icon"><i class={*icon}></i></div>
                    <h4>{ *title }</h4>
                    <p>{ *text }</p>
                </div>
            })}
        </section>
    }
}

pub fn render_footer() -> Html {
    let year = Date::new_0().get_full_year();

    html! {
        <footer class="app-footer">
            <div>
                <h5>{"AI Upscaler"}</h5>
                <p>{"Raise the resolution of your photos with AI"}</p>
            </div>
            <div>
                <p>{ format!("© {} AI Upscaler", year) }</p>
            </div>
        </footer>
    }
}
