use super::super::{Model, Msg};
use gloo_timers::callback::Timeout;
use yew::html::Scope;
use yew::prelude::*;

/// How long a notification stays on screen unless dismissed earlier.
const NOTIFICATION_TTL_MS: u32 = 4_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    fn class(self) -> &'static str {
        match self {
            NotificationKind::Success => "notification-success",
            NotificationKind::Warning => "notification-warning",
            NotificationKind::Error => "notification-error",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "fa-solid fa-circle-check",
            NotificationKind::Warning => "fa-solid fa-triangle-exclamation",
            NotificationKind::Error => "fa-solid fa-circle-exclamation",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub text: String,
}

pub fn push_notification(model: &mut Model, ctx: &Context<Model>, kind: NotificationKind, text: String) {
    let id = model.next_notification_id;
    model.next_notification_id += 1;
    model.notifications.push(Notification { id, kind, text });

    let link = ctx.link().clone();
    let timeout = Timeout::new(NOTIFICATION_TTL_MS, move || {
        link.send_message(Msg::DismissNotification(id));
    });
    model.notification_timeouts.insert(id, timeout);
}

pub fn dismiss_notification(model: &mut Model, id: u64) -> bool {
    // Dropping the timeout cancels it when dismissed by hand.
    model.notification_timeouts.remove(&id);
    let before = model.notifications.len();
    model.notifications.retain(|n| n.id != id);
    model.notifications.len() != before
}

pub fn render_notifications(notifications: &[Notification], link: &Scope<Model>) -> Html {
    if notifications.is_empty() {
        return html! {};
    }

    html! {
        <div class="notification-stack">
            { for notifications.iter().map(|notification| {
                let id = notification.id;
                html! {
                    <div class={classes!("notification", notification.kind.class())} key={id.to_string()}>
                        <i class={notification.kind.icon()}></i>
                        <span>{ &notification.text }</span>
                        <button
                            class="close-btn"
                            title="Dismiss"
                            onclick={link.callback(move |_| Msg::DismissNotification(id))}
                        >
                            <i class="fa-solid fa-times"></i>
                        </button>
                    </div>
                }
            })}
        </div>
    }
}
