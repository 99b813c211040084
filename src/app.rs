use iced::{task, Task};

use crate::api::{ApiClient, RunningStatus};
use crate::application::{CycleId, Effect, Shell, TimerToken};
use crate::ui::{self, ShellMessage};
use crate::utils::Location;

const DISCONNECT_WARNING: &str =
    "The download backend stopped responding. RMD will reload when you close this message.";

pub struct RmdApp {
    shell: Shell,
    location: Location,
    api_client: ApiClient,
    // Aborting these only saves work; stale firings are also rejected by token.
    poll_timer: Option<task::Handle>,
    watchdog: Option<task::Handle>,
}

impl RmdApp {
    /// Mount the shell at `location`, talking to the backend through `api_client`.
    pub fn new(location: Location, api_client: ApiClient, shell: Shell) -> Self {
        Self {
            shell,
            location,
            api_client,
            poll_timer: None,
            watchdog: None,
        }
    }

    /// Entry point for `iced::application`: the first status check.
    pub fn boot(mut self) -> (Self, Task<Message>) {
        let effects = self.shell.boot();
        let task = self.run(effects);
        (self, task)
    }

    fn reload(&mut self) -> Task<Message> {
        abort(self.poll_timer.take());
        abort(self.watchdog.take());
        let effects = self.shell.reload(self.location.page_hint());
        self.run(effects)
    }

    fn run(&mut self, effects: Vec<Effect>) -> Task<Message> {
        let tasks: Vec<_> = effects
            .into_iter()
            .map(|effect| self.run_effect(effect))
            .collect();
        Task::batch(tasks)
    }

    fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::WriteFragment(page) => {
                self.location.set_page(&page);
                tracing::debug!(location = %self.location, "location updated");
                Task::none()
            }
            Effect::RequestStatus(cycle) => {
                let api_client = self.api_client.clone();
                Task::perform(
                    async move {
                        api_client
                            .get_running_status()
                            .await
                            .map_err(|e| e.to_string())
                    },
                    move |result| Message::StatusReceived(cycle, result),
                )
            }
            Effect::ArmWatchdog { token, after } => {
                let (task, handle) = Task::perform(tokio::time::sleep(after), move |_| {
                    Message::WatchdogFired(token)
                })
                .abortable();
                abort(self.watchdog.replace(handle));
                task
            }
            Effect::DisarmWatchdog => {
                abort(self.watchdog.take());
                Task::none()
            }
            Effect::SchedulePoll { token, after } => {
                let (task, handle) =
                    Task::perform(tokio::time::sleep(after), move |_| Message::PollDue(token))
                        .abortable();
                abort(self.poll_timer.replace(handle));
                task
            }
            Effect::CancelPoll => {
                abort(self.poll_timer.take());
                Task::none()
            }
            Effect::SendStart => {
                let api_client = self.api_client.clone();
                Task::perform(
                    async move { api_client.start_download().await.map_err(|e| e.to_string()) },
                    Message::StartAcknowledged,
                )
            }
            Effect::ExpireNotice { id, after } => {
                Task::perform(tokio::time::sleep(after), move |_| Message::NoticeExpired(id))
            }
            Effect::ShowDisconnect => Task::perform(
                async {
                    rfd::AsyncMessageDialog::new()
                        .set_level(rfd::MessageLevel::Warning)
                        .set_title("RMD backend disconnected")
                        .set_description(DISCONNECT_WARNING)
                        .set_buttons(rfd::MessageButtons::Ok)
                        .show()
                        .await
                },
                |_| Message::DisconnectAcknowledged,
            ),
        }
    }
}

fn abort(handle: Option<task::Handle>) {
    if let Some(handle) = handle {
        handle.abort();
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(ShellMessage),
    PollDue(TimerToken),
    StatusReceived(CycleId, Result<RunningStatus, String>),
    WatchdogFired(TimerToken),
    StartAcknowledged(Result<bool, String>),
    NoticeExpired(u64),
    /// The user closed the disconnect warning
    DisconnectAcknowledged,
}

pub fn update(app: &mut RmdApp, message: Message) -> Task<Message> {
    let effects = match message {
        Message::UiMessage(ui_msg) => match ui_msg {
            ShellMessage::SelectPage(index) => app.shell.select_page(index),
            ShellMessage::StartPressed => app.shell.start_download(),
            ShellMessage::DismissNotice(id) => {
                app.shell.dismiss_notice(id);
                Vec::new()
            }
        },
        Message::PollDue(token) => app.shell.poll_due(token),
        Message::StatusReceived(cycle, result) => app.shell.status_received(cycle, result),
        Message::WatchdogFired(token) => app.shell.watchdog_fired(token),
        Message::StartAcknowledged(result) => app.shell.start_acknowledged(result),
        Message::NoticeExpired(id) => {
            app.shell.dismiss_notice(id);
            Vec::new()
        }
        Message::DisconnectAcknowledged => return app.reload(),
    };

    app.run(effects)
}

pub fn view(app: &RmdApp) -> iced::Element<'_, Message> {
    ui::view(&app.shell).map(Message::UiMessage)
}

pub fn title(app: &RmdApp) -> String {
    format!("RMD - {}", app.location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::ApiConfig, application::ShellTiming, domain::default_pages};

    fn mount(location: &str) -> RmdApp {
        let location = Location::parse(location).unwrap();
        let shell =
            Shell::new(default_pages(), location.page_hint(), ShellTiming::default()).unwrap();
        let api_client = ApiClient::new(ApiConfig::default()).unwrap();
        let (app, _) = RmdApp::new(location, api_client, shell).boot();
        app
    }

    #[tokio::test]
    async fn test_tab_selection_updates_title() {
        let mut app = mount("http://127.0.0.1:7505/#home");
        let _ = update(&mut app, Message::UiMessage(ShellMessage::SelectPage(2)));
        assert_eq!(title(&app), "RMD - http://127.0.0.1:7505/#settings");
    }

    #[tokio::test]
    async fn test_boot_arms_watchdog() {
        let app = mount("http://127.0.0.1:7505/");
        assert!(app.watchdog.is_some());
        assert!(app.poll_timer.is_none());
    }

    #[tokio::test]
    async fn test_reload_keeps_selected_tab() {
        let mut app = mount("http://127.0.0.1:7505/");
        let _ = update(&mut app, Message::UiMessage(ShellMessage::SelectPage(3)));
        let _ = update(&mut app, Message::DisconnectAcknowledged);
        assert_eq!(app.shell.active_index(), 3);
        assert!(!app.shell.is_disconnected());
    }
}
