// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{DishId, TabKind};

pub const ERROR_DIALOG_TITLE: &str = "Ошибка";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub active_tab: TabKind,
    pub dialog: Option<Dialog>,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_tab: TabKind::Entry,
            dialog: None,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextTab,
    PrevTab,
    ShowError(String),
    DismissDialog,
    DishSaved(DishId),
    ChartPlotted(usize),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    TabChanged(TabKind),
    DialogOpened(Dialog),
    DialogClosed,
    DishSaved(DishId),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::ShowError(message) => {
                let dialog = Dialog {
                    title: ERROR_DIALOG_TITLE.to_owned(),
                    message,
                };
                self.dialog = Some(dialog.clone());
                vec![AppEvent::DialogOpened(dialog)]
            }
            AppCommand::DismissDialog => {
                if self.dialog.take().is_some() {
                    vec![AppEvent::DialogClosed]
                } else {
                    Vec::new()
                }
            }
            AppCommand::DishSaved(id) => {
                vec![
                    AppEvent::DishSaved(id),
                    self.set_status(&format!("блюдо #{id} добавлено")),
                ]
            }
            AppCommand::ChartPlotted(points) => {
                vec![self.set_status(&format!("точек на графике: {points}"))]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = TabKind::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_tab = tabs[next];
        vec![AppEvent::TabChanged(self.active_tab)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
