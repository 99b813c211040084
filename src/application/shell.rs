use std::time::Duration;

use crate::{
    api::RunningStatus,
    domain::{AppError, DownloadPhase, Notice, NoticeLevel, Page, Progress},
};

use super::timer::{ScheduledTimer, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellTiming {
    /// Delay between the end of one poll cycle and the start of the next.
    pub poll_interval: Duration,
    /// How long a status request may stay unanswered before the backend is
    /// considered disconnected.
    pub watchdog: Duration,
    pub notice_ttl: Duration,
}

impl Default for ShellTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1500),
            watchdog: Duration::from_millis(5000),
            notice_ttl: Duration::from_millis(4000),
        }
    }
}

/// Identifies one status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CycleId(u64);

/// Side effects requested by the shell. The caller carries them out and feeds
/// the outcome back through the matching `Shell` method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Rewrite the location fragment to this page name.
    WriteFragment(String),
    /// Issue a status request; answer with [`Shell::status_received`].
    RequestStatus(CycleId),
    /// Answer with [`Shell::watchdog_fired`] after `after`.
    ArmWatchdog { token: TimerToken, after: Duration },
    DisarmWatchdog,
    /// Answer with [`Shell::poll_due`] after `after`. Replaces any pending poll.
    SchedulePoll { token: TimerToken, after: Duration },
    CancelPoll,
    /// Send the start command; answer with [`Shell::start_acknowledged`].
    SendStart,
    ExpireNotice { id: u64, after: Duration },
    /// Show the blocking disconnect warning. Acknowledging it reloads.
    ShowDisconnect,
}

/// Tab and poll-loop state of the RMD window.
#[derive(Debug, Clone)]
pub struct Shell {
    pages: Vec<Page>,
    active: usize,
    phase: DownloadPhase,
    progress: Option<Progress>,
    timing: ShellTiming,
    poll_timer: ScheduledTimer,
    watchdog: ScheduledTimer,
    cycles: u64,
    in_flight: Option<CycleId>,
    // The outstanding request was sent before the backend accepted a start.
    in_flight_stale: bool,
    start_pending: bool,
    disconnected: bool,
    notices: Vec<Notice>,
    next_notice: u64,
}

impl Shell {
    /// Build the shell with the page named by `hint` active, or the first page
    /// when nothing matches.
    pub fn new(
        pages: Vec<Page>,
        hint: Option<&str>,
        timing: ShellTiming,
    ) -> Result<Self, AppError> {
        let first = pages.first().ok_or(AppError::NoPages)?;
        if !first.always_enabled {
            return Err(AppError::GatedFallbackPage(first.name.to_string()));
        }

        let active = page_index(&pages, hint);

        Ok(Self {
            pages,
            active,
            phase: DownloadPhase::Idle,
            progress: None,
            timing,
            poll_timer: ScheduledTimer::default(),
            watchdog: ScheduledTimer::default(),
            cycles: 0,
            in_flight: None,
            in_flight_stale: false,
            start_pending: false,
            disconnected: false,
            notices: Vec::new(),
            next_notice: 0,
        })
    }

    /// First status check after mounting.
    pub fn boot(&mut self) -> Vec<Effect> {
        tracing::info!(page = self.active_page().name, "shell mounted");
        self.poll_status()
    }

    /// Start over from `hint` as after a page reload. Timer and cycle counters
    /// keep running so that nothing scheduled before the reload is mistaken
    /// for something scheduled after it.
    pub fn reload(&mut self, hint: Option<&str>) -> Vec<Effect> {
        tracing::info!(hint = ?hint, "reloading shell");

        let mut effects = Vec::new();
        if self.poll_timer.cancel() {
            effects.push(Effect::CancelPoll);
        }
        if self.watchdog.cancel() {
            effects.push(Effect::DisarmWatchdog);
        }

        self.active = page_index(&self.pages, hint);
        self.phase = DownloadPhase::Idle;
        self.progress = None;
        self.in_flight = None;
        self.in_flight_stale = false;
        self.start_pending = false;
        self.disconnected = false;
        self.notices.clear();

        effects.extend(self.poll_status());
        effects
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_page(&self) -> &Page {
        &self.pages[self.active]
    }

    pub fn phase(&self) -> DownloadPhase {
        self.phase
    }

    pub fn is_downloading(&self) -> bool {
        self.phase == DownloadPhase::Downloading
    }

    /// A start command has been sent and not yet answered.
    pub fn is_starting(&self) -> bool {
        self.start_pending
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Last progress the backend reported. Usually absent.
    pub fn progress(&self) -> Option<&Progress> {
        self.progress.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_page_enabled(&self, index: usize) -> bool {
        match self.pages.get(index) {
            Some(page) => page.always_enabled || !self.is_downloading(),
            None => false,
        }
    }

    pub fn select_page(&mut self, index: usize) -> Vec<Effect> {
        if !self.is_page_enabled(index) {
            tracing::debug!(index, "page not selectable");
            return Vec::new();
        }

        self.active = index;
        let fragment = self.pages[index].fragment();
        tracing::debug!(page = %fragment, "page selected");
        vec![Effect::WriteFragment(fragment)]
    }

    /// Begin a poll cycle unless one is already outstanding.
    pub fn poll_status(&mut self) -> Vec<Effect> {
        if let Some(cycle) = self.in_flight {
            tracing::debug!(?cycle, "status request already outstanding");
            return Vec::new();
        }

        self.cycles += 1;
        let cycle = CycleId(self.cycles);
        self.in_flight = Some(cycle);
        self.in_flight_stale = false;
        let token = self.watchdog.schedule();
        tracing::trace!(?cycle, "polling backend status");

        vec![
            Effect::RequestStatus(cycle),
            Effect::ArmWatchdog {
                token,
                after: self.timing.watchdog,
            },
        ]
    }

    pub fn poll_due(&mut self, token: TimerToken) -> Vec<Effect> {
        if !self.poll_timer.fire(token) {
            return Vec::new();
        }
        self.poll_status()
    }

    /// Handle the answer to a status request.
    ///
    /// A failed request leaves the cycle outstanding and the watchdog armed,
    /// so an erroring backend ends up in the same disconnect warning as a
    /// silent one.
    pub fn status_received(
        &mut self,
        cycle: CycleId,
        result: Result<RunningStatus, String>,
    ) -> Vec<Effect> {
        if self.in_flight != Some(cycle) {
            tracing::debug!(?cycle, "ignoring stale status response");
            return Vec::new();
        }

        let status = match result {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(?cycle, error = %e, "status request failed");
                return Vec::new();
            }
        };

        self.in_flight = None;
        let mut effects = Vec::new();
        if self.watchdog.cancel() {
            effects.push(Effect::DisarmWatchdog);
        }

        // A reading taken before the start was accepted says nothing about
        // the backend now; poll again right away instead of applying it.
        let after = if std::mem::take(&mut self.in_flight_stale) {
            tracing::debug!(?cycle, "discarding status taken before start");
            Duration::ZERO
        } else {
            effects.extend(self.apply_status(status));
            self.timing.poll_interval
        };

        let token = self.poll_timer.schedule();
        effects.push(Effect::SchedulePoll { token, after });
        effects
    }

    fn apply_status(&mut self, status: RunningStatus) -> Vec<Effect> {
        let phase = if status.running {
            DownloadPhase::Downloading
        } else {
            DownloadPhase::Idle
        };
        if phase != self.phase {
            tracing::info!(?phase, "download phase changed");
        }
        self.phase = phase;
        self.progress = status.progress;
        self.leave_gated_page()
    }

    /// Move to the first page if the active one is locked while downloading.
    fn leave_gated_page(&mut self) -> Vec<Effect> {
        if !self.is_downloading() || self.active_page().always_enabled {
            return Vec::new();
        }

        let name = self.active_page().name;
        tracing::info!(page = name, "leaving page while downloading");

        self.active = 0;
        let fragment = Effect::WriteFragment(self.pages[0].fragment());
        let notice = self.notify(
            NoticeLevel::Info,
            format!("The {} page is unavailable while downloading.", name),
        );
        vec![fragment, notice]
    }

    pub fn watchdog_fired(&mut self, token: TimerToken) -> Vec<Effect> {
        if !self.watchdog.fire(token) || self.in_flight.is_none() {
            return Vec::new();
        }
        if self.disconnected {
            return Vec::new();
        }

        let timeout_ms = u64::try_from(self.timing.watchdog.as_millis()).unwrap_or(u64::MAX);
        tracing::error!(timeout_ms, "backend did not answer status request");
        self.disconnected = true;
        vec![Effect::ShowDisconnect]
    }

    pub fn start_download(&mut self) -> Vec<Effect> {
        if self.is_downloading() || self.start_pending {
            tracing::debug!("start ignored, already downloading");
            return Vec::new();
        }

        tracing::info!("sending start command");
        self.start_pending = true;
        vec![Effect::SendStart]
    }

    pub fn start_acknowledged(&mut self, result: Result<bool, String>) -> Vec<Effect> {
        if !self.start_pending {
            return Vec::new();
        }
        self.start_pending = false;

        match result {
            Ok(true) => {
                tracing::info!("backend started downloading");
                self.phase = DownloadPhase::Downloading;

                let mut effects = self.leave_gated_page();
                if self.poll_timer.cancel() {
                    effects.push(Effect::CancelPoll);
                }
                if self.in_flight.is_some() {
                    self.in_flight_stale = true;
                } else {
                    effects.extend(self.poll_status());
                }
                effects
            }
            Ok(false) => {
                tracing::warn!("backend refused to start downloading");
                vec![self.notify(
                    NoticeLevel::Error,
                    "The backend refused to start downloading.".to_string(),
                )]
            }
            Err(e) => {
                tracing::warn!(error = %e, "start command failed");
                vec![self.notify(
                    NoticeLevel::Error,
                    format!("Could not start downloading: {}", e),
                )]
            }
        }
    }

    pub fn dismiss_notice(&mut self, id: u64) {
        self.notices.retain(|notice| notice.id != id);
    }

    fn notify(&mut self, level: NoticeLevel, text: String) -> Effect {
        self.next_notice += 1;
        let id = self.next_notice;
        self.notices.push(Notice { id, level, text });
        Effect::ExpireNotice {
            id,
            after: self.timing.notice_ttl,
        }
    }
}

/// Index of the page named by `hint`, or 0.
pub fn page_index(pages: &[Page], hint: Option<&str>) -> usize {
    hint.and_then(|hint| pages.iter().position(|page| page.matches(hint)))
        .unwrap_or(0)
}
