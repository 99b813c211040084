use iced::{
    widget::{button, center, column, container, opaque, row, stack, text, Column, Row, Space},
    Alignment, Element, Length, Theme,
};

use crate::{
    application::Shell,
    domain::{DownloadPhase, NoticeLevel, PageView, Progress},
};

pub const START_LABEL: &str = "Start Downloading!";
pub const DOWNLOADING_LABEL: &str = "Downloading…";

#[derive(Debug, Clone)]
pub enum ShellMessage {
    SelectPage(usize),
    StartPressed,
    DismissNotice(u64),
}

/// How one tab renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub index: usize,
    pub name: &'static str,
    pub active: bool,
    pub enabled: bool,
}

pub fn tabs(shell: &Shell) -> Vec<Tab> {
    shell
        .pages()
        .iter()
        .enumerate()
        .map(|(index, page)| Tab {
            index,
            name: page.name,
            active: index == shell.active_index(),
            enabled: shell.is_page_enabled(index),
        })
        .collect()
}

/// Label of the trailing action control and whether it can be pressed.
pub fn action(shell: &Shell) -> (&'static str, bool) {
    if shell.is_downloading() {
        (DOWNLOADING_LABEL, false)
    } else {
        (START_LABEL, !shell.is_starting())
    }
}

pub fn view(shell: &Shell) -> Element<'_, ShellMessage> {
    let content = column![tab_bar(shell), notices(shell), page_panel(shell)]
        .padding(20)
        .spacing(10);

    if shell.is_disconnected() {
        stack![content, disconnect_overlay()].into()
    } else {
        content.into()
    }
}

fn tab_bar(shell: &Shell) -> Element<'_, ShellMessage> {
    let mut bar = Row::new().spacing(6).align_y(Alignment::Center);

    for tab in tabs(shell) {
        let style: fn(&Theme, button::Status) -> button::Style = if tab.active {
            button::primary
        } else {
            button::secondary
        };

        bar = bar.push(
            button(text(tab.name))
                .padding([8, 16])
                .style(style)
                .on_press_maybe(tab.enabled.then_some(ShellMessage::SelectPage(tab.index))),
        );
    }

    let (label, enabled) = action(shell);
    bar.push(Space::new().width(Length::Fill))
        .push(
            button(text(label))
                .padding([8, 20])
                .style(button::success)
                .on_press_maybe(enabled.then_some(ShellMessage::StartPressed)),
        )
        .into()
}

fn notices(shell: &Shell) -> Element<'_, ShellMessage> {
    let mut list = Column::new().spacing(4);

    for notice in shell.notices() {
        let body = match notice.level {
            NoticeLevel::Info => text(&notice.text).size(14),
            NoticeLevel::Error => text(&notice.text).size(14).style(text::danger),
        };

        list = list.push(
            container(
                row![
                    body,
                    Space::new().width(Length::Fill),
                    button(text("×"))
                        .style(button::text)
                        .on_press(ShellMessage::DismissNotice(notice.id)),
                ]
                .align_y(Alignment::Center),
            )
            .padding([4, 10])
            .width(Length::Fill)
            .style(container::rounded_box),
        );
    }

    list.into()
}

fn page_panel(shell: &Shell) -> Element<'_, ShellMessage> {
    let page = shell.active_page();

    let body: Element<'_, ShellMessage> = match page.view {
        PageView::Home => home(shell),
        PageView::Sources => column![
            text("Sources").size(24),
            text("Sources and their filters are managed by the RMD backend.").size(14),
            text("This page is locked while a download is running.").size(12),
        ]
        .spacing(8)
        .into(),
        PageView::Settings => column![
            text("Settings").size(24),
            text("Settings are stored by the RMD backend.").size(14),
            text("This page is locked while a download is running.").size(12),
        ]
        .spacing(8)
        .into(),
        PageView::Browser => column![
            text("Browser").size(24),
            text("Browse the media saved so far.").size(14),
        ]
        .spacing(8)
        .into(),
    };

    container(body)
        .padding(20)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn home(shell: &Shell) -> Element<'_, ShellMessage> {
    let status = match shell.phase() {
        DownloadPhase::Downloading => "The backend is downloading.",
        DownloadPhase::Idle if shell.is_starting() => "Starting…",
        DownloadPhase::Idle => "Idle. Press \"Start Downloading!\" to fetch new posts.",
    };

    let mut body = column![text("RMD").size(32), text(status).size(16)].spacing(8);
    if let Some(progress) = shell.progress() {
        body = body.push(text(progress_line(progress)).size(14));
    }
    body.into()
}

fn progress_line(progress: &Progress) -> String {
    format!(
        "Posts: {}  URLs: {}  Failed: {}",
        progress.total_posts, progress.total_urls, progress.failed_urls
    )
}

fn disconnect_overlay<'a>() -> Element<'a, ShellMessage> {
    opaque(center(
        container(
            column![
                text("Backend disconnected").size(24),
                text("The download backend stopped answering. Acknowledge the warning to reload.")
                    .size(14),
            ]
            .spacing(8),
        )
        .padding(20)
        .style(container::rounded_box),
    ))
}
