//! Terminal application state.
//!
//! Key handling never waits on the network. Each call runs on its own tokio
//! task and reports back as an [`Outcome`], which the event loop applies
//! between frames.

use std::future::Future;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::confirm::ConfirmDialog;
use super::notifications::Notifications;
use super::task_form::{FormMode, Submission, TaskForm};
use super::task_list::TaskList;
use crate::client::TaskClient;
use crate::client::error::ClientError;
use crate::client::transport::TaskTransport;
use crate::domain::request::{DeleteResponse, UpdateTaskRequest};
use crate::domain::task::{Task, TaskId, TaskStatus};
use crate::domain::validation::Field;

#[derive(Debug)]
pub enum Outcome {
    Loaded(Result<Vec<Task>, ClientError>),
    Saved { mode: FormMode, result: Result<Task, ClientError> },
    StatusChanged { id: TaskId, previous: TaskStatus, result: Result<Task, ClientError> },
    Deleted { id: TaskId, result: Result<DeleteResponse, ClientError> },
}

pub struct App<T: TaskTransport> {
    client: TaskClient<T>,
    list: TaskList,
    form: Option<TaskForm>,
    confirm: Option<(ConfirmDialog, TaskId)>,
    notifications: Notifications,
    tx: UnboundedSender<Outcome>,
    rx: UnboundedReceiver<Outcome>,
    pending: usize,
    should_quit: bool,
}

impl<T: TaskTransport> App<T> {
    pub fn new(client: TaskClient<T>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            list: TaskList::default(),
            form: None,
            confirm: None,
            notifications: Notifications::default(),
            tx,
            rx,
            pending: 0,
            should_quit: false,
        }
    }

    pub fn client(&self) -> &TaskClient<T> {
        &self.client
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn form(&self) -> Option<&TaskForm> {
        self.form.as_ref()
    }

    pub fn confirm(&self) -> Option<&ConfirmDialog> {
        self.confirm.as_ref().map(|(dialog, _)| dialog)
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Loads the list for the first frame.
    pub fn start(&mut self) {
        self.list.set_loading();
        self.load(false);
    }

    fn spawn<F>(&mut self, call: F)
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // The receiver lives as long as the app.
            let _ = tx.send(call.await);
        });
    }

    fn load(&mut self, force: bool) {
        let client = self.client.clone();
        self.spawn(async move {
            let result = if force { client.refetch_tasks().await } else { client.list_tasks().await };
            Outcome::Loaded(result)
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.confirm.is_some() {
            self.handle_confirm_key(key);
        } else if self.form.is_some() {
            self.handle_form_key(key);
        } else {
            self.handle_list_key(key);
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Right | KeyCode::Char('l') => self.list.select_next(),
            KeyCode::Left | KeyCode::Char('h') => self.list.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(),
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(),
            KeyCode::Char('r') => {
                self.list.set_loading();
                self.load(true);
            }
            KeyCode::Char('n') => self.form = Some(TaskForm::create()),
            KeyCode::Char('e') => {
                if let Some(item) = self.list.selected() {
                    self.form = Some(TaskForm::edit(item.task()));
                }
            }
            KeyCode::Char('d') => {
                if let Some(item) = self.list.selected() {
                    self.confirm = Some((ConfirmDialog::delete_task(), item.task().id));
                }
            }
            KeyCode::Char('s') | KeyCode::Enter => self.change_status(TaskStatus::next),
            KeyCode::Char('S') => self.change_status(TaskStatus::previous),
            _ => {}
        }
    }

    fn change_status(&mut self, step: fn(TaskStatus) -> TaskStatus) {
        let Some(id) = self.list.selected().map(|item| item.task().id) else { return };
        let Some(item) = self.list.item_mut(&id) else { return };
        let next = step(item.status());
        let Some(previous) = item.begin_status_change(next) else { return };

        let client = self.client.clone();
        self.spawn(async move {
            let result = client.update_task(&id, &UpdateTaskRequest::status(next)).await;
            Outcome::StatusChanged { id, previous, result }
        });
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else { return };
        if form.saving {
            return;
        }
        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left if form.active() == Field::Status => form.cycle_status(false),
            KeyCode::Right if form.active() == Field::Status => form.cycle_status(true),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.input(c),
            KeyCode::Enter => {
                let Some(submission) = form.submission() else { return };
                form.saving = true;
                let mode = form.mode();
                let client = self.client.clone();
                self.spawn(async move {
                    let result = match &submission {
                        Submission::Create(request) => client.create_task(request).await,
                        Submission::Update(id, request) => client.update_task(id, request).await,
                    };
                    Outcome::Saved { mode, result }
                });
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let Some((dialog, id)) = self.confirm.as_mut() else { return };
        if dialog.busy {
            return;
        }
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                dialog.busy = true;
                let id = *id;
                let client = self.client.clone();
                self.spawn(async move {
                    let result = client.delete_task(&id).await;
                    Outcome::Deleted { id, result }
                });
            }
            KeyCode::Char('n') | KeyCode::Esc => self.confirm = None,
            _ => {}
        }
    }

    pub fn apply(&mut self, outcome: Outcome) {
        self.pending = self.pending.saturating_sub(1);
        match outcome {
            Outcome::Loaded(Ok(tasks)) => self.list.set_tasks(tasks),
            Outcome::Loaded(Err(error)) => {
                tracing::debug!(error = %error, "task list fetch failed");
                self.list.set_error(error.message());
            }
            Outcome::Saved { mode, result: Ok(_) } => {
                self.form = None;
                self.notifications.show_success(match mode {
                    FormMode::Create => "Task created",
                    FormMode::Edit(_) => "Task updated",
                });
                self.load(false);
            }
            Outcome::Saved { result: Err(error), .. } => {
                if let Some(form) = self.form.as_mut() {
                    form.saving = false;
                }
                self.notifications.show_error(error.message());
                self.load(false);
            }
            Outcome::StatusChanged { result: Ok(_), .. } => self.load(false),
            Outcome::StatusChanged { id, previous, result: Err(error) } => {
                if let Some(item) = self.list.item_mut(&id) {
                    item.revert_status(previous);
                }
                self.notifications.show_error(error.message());
                self.load(false);
            }
            Outcome::Deleted { id, result } => {
                if self.confirm.as_ref().is_some_and(|(_, pending)| *pending == id) {
                    self.confirm = None;
                }
                match result {
                    Ok(_) => self.notifications.show_success("Task deleted"),
                    Err(error) => self.notifications.show_error(error.message()),
                }
                // The server's answer made the cached list stale either way.
                self.load(false);
            }
        }
    }

    /// Applies every outcome that has already arrived.
    pub fn drain(&mut self) {
        while let Ok(outcome) = self.rx.try_recv() {
            self.apply(outcome);
        }
    }

    /// Waits until no call is in flight, applying outcomes as they arrive.
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.rx.recv().await {
                Some(outcome) => self.apply(outcome),
                None => break,
            }
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.notifications.tick(now);
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        render_header(frame, chunks[0]);
        self.list.render(frame, chunks[1]);
        frame.render_widget(Paragraph::new(self.help_line()), chunks[2]);

        if let Some(form) = &self.form {
            form.render(frame, area);
        }
        if let Some((dialog, _)) = &self.confirm {
            dialog.render(frame, area);
        }
        self.notifications.render(frame, area);
    }

    fn help_line(&self) -> Line<'static> {
        let text = if self.confirm.is_some() {
            "y confirm  n cancel"
        } else if self.form.is_some() {
            "Tab next field  Shift-Tab previous  Left/Right status  Enter save  Esc cancel"
        } else {
            "arrows move  n new  e edit  d delete  s/S status  r refresh  q quit"
        };
        Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled("todAI", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("Your Intelligent Task Manager", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(title).block(Block::default().borders(Borders::BOTTOM)), area);
}
