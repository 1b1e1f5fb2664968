use foundation::ids::TowerId;
use foundation::math::LatLng;

use crate::connection::{Connection, ConnectionChange};
use crate::project::ProjectState;

/// Zoom and pitch used when the context menu focuses a tower.
pub const FOCUS_ZOOM: f64 = 18.0;
pub const FOCUS_PITCH_DEG: f64 = 60.0;

/// Manual connection editing: pick a start tower, then an end tower.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ConnectState {
    #[default]
    Idle,
    AwaitingEnd(TowerId),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Started(TowerId),
    Cancelled,
    Connected(Connection),
}

/// Two-step, non-reentrant connection editor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectionEditor {
    state: ConnectState,
}

impl ConnectionEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectState {
        self.state
    }

    pub fn pending_start(&self) -> Option<TowerId> {
        match self.state {
            ConnectState::Idle => None,
            ConnectState::AwaitingEnd(start) => Some(start),
        }
    }

    pub fn select(&mut self, tower: TowerId) -> EditOutcome {
        match self.state {
            ConnectState::Idle => {
                self.state = ConnectState::AwaitingEnd(tower);
                EditOutcome::Started(tower)
            }
            ConnectState::AwaitingEnd(start) if start == tower => {
                self.state = ConnectState::Idle;
                EditOutcome::Cancelled
            }
            ConnectState::AwaitingEnd(start) => {
                self.state = ConnectState::Idle;
                EditOutcome::Connected(Connection::new(start, tower))
            }
        }
    }

    pub fn cancel(&mut self) {
        self.state = ConnectState::Idle;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    OpenDetails(TowerId),
    Edit(EditOutcome),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContextAction {
    ShowDetails,
    Focus,
    ExecutionReport,
    Hide,
    Close,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ContextEffect {
    OpenDetails(TowerId),
    FlyTo {
        target: LatLng,
        zoom: f64,
        pitch_deg: f64,
    },
    OpenExecutionReport(TowerId),
    VisibilityToggled {
        tower: TowerId,
        hidden: bool,
    },
    Dismissed,
}

/// Tower click and context-menu handling.
///
/// Outside connect mode a click opens the tower's details; inside it, clicks
/// drive the [`ConnectionEditor`]. Completed connections are written into the
/// project with last-write-wins on the start tower.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Interaction {
    connect_mode: bool,
    editor: ConnectionEditor,
    context_menu: Option<TowerId>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect_mode(&self) -> bool {
        self.connect_mode
    }

    /// Leaving connect mode drops a pending start tower.
    pub fn set_connect_mode(&mut self, on: bool) {
        self.connect_mode = on;
        if !on {
            self.editor.cancel();
        }
    }

    pub fn pending_start(&self) -> Option<TowerId> {
        self.editor.pending_start()
    }

    pub fn click(&mut self, project: &mut ProjectState, tower: TowerId) -> ClickOutcome {
        self.context_menu = None;
        if !self.connect_mode {
            return ClickOutcome::OpenDetails(tower);
        }

        let outcome = self.editor.select(tower);
        if let EditOutcome::Connected(conn) = outcome
            && project.connect(conn) == ConnectionChange::Ignored
        {
            return ClickOutcome::Edit(EditOutcome::Cancelled);
        }
        ClickOutcome::Edit(outcome)
    }

    pub fn open_context_menu(&mut self, tower: TowerId) {
        self.context_menu = Some(tower);
    }

    pub fn context_menu(&self) -> Option<TowerId> {
        self.context_menu
    }

    /// Runs an action for the tower whose menu is open and closes the menu.
    ///
    /// Returns `None` when no menu is open or the tower no longer exists.
    pub fn run_context_action(
        &mut self,
        project: &mut ProjectState,
        action: ContextAction,
    ) -> Option<ContextEffect> {
        let tower = self.context_menu.take()?;
        let position = project.tower(tower)?.position;

        let effect = match action {
            ContextAction::ShowDetails => ContextEffect::OpenDetails(tower),
            ContextAction::Focus => ContextEffect::FlyTo {
                target: position.lat_lng(),
                zoom: FOCUS_ZOOM,
                pitch_deg: FOCUS_PITCH_DEG,
            },
            ContextAction::ExecutionReport => ContextEffect::OpenExecutionReport(tower),
            ContextAction::Hide => ContextEffect::VisibilityToggled {
                tower,
                hidden: project.toggle_hidden(tower),
            },
            ContextAction::Close => ContextEffect::Dismissed,
        };
        Some(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ClickOutcome, ConnectState, ConnectionEditor, ContextAction, ContextEffect, EditOutcome,
        Interaction,
    };
    use crate::connection::Connection;
    use crate::project::ProjectState;
    use crate::tower::TowerDraft;
    use foundation::ids::TowerId;
    use foundation::math::GeoPosition;

    fn project_with(n: usize) -> (ProjectState, Vec<TowerId>) {
        let mut p = ProjectState::new();
        let ids = (0..n)
            .map(|i| {
                p.upsert_tower(TowerDraft::new(
                    format!("T{i}"),
                    GeoPosition::new(i as f64 * 0.003, 0.0, 0.0),
                ))
            })
            .collect();
        (p, ids)
    }

    #[test]
    fn editor_two_step_flow() {
        let mut e = ConnectionEditor::new();
        assert_eq!(e.select(TowerId(1)), EditOutcome::Started(TowerId(1)));
        assert_eq!(e.state(), ConnectState::AwaitingEnd(TowerId(1)));
        assert_eq!(
            e.select(TowerId(2)),
            EditOutcome::Connected(Connection::new(TowerId(1), TowerId(2)))
        );
        assert_eq!(e.state(), ConnectState::Idle);
    }

    #[test]
    fn selecting_start_again_cancels() {
        let mut e = ConnectionEditor::new();
        e.select(TowerId(7));
        assert_eq!(e.select(TowerId(7)), EditOutcome::Cancelled);
        assert_eq!(e.pending_start(), None);
    }

    #[test]
    fn click_outside_connect_mode_opens_details() {
        let (mut p, ids) = project_with(2);
        let mut ui = Interaction::new();
        assert_eq!(ui.click(&mut p, ids[0]), ClickOutcome::OpenDetails(ids[0]));
        assert!(p.connections().is_empty());
    }

    #[test]
    fn connect_mode_replaces_outgoing_connection() {
        let (mut p, ids) = project_with(3);
        let mut ui = Interaction::new();
        ui.set_connect_mode(true);

        ui.click(&mut p, ids[0]);
        ui.click(&mut p, ids[1]);
        ui.click(&mut p, ids[0]);
        let out = ui.click(&mut p, ids[2]);

        assert_eq!(
            out,
            ClickOutcome::Edit(EditOutcome::Connected(Connection::new(ids[0], ids[2])))
        );
        let all: Vec<_> = p.connections().iter().copied().collect();
        assert_eq!(all, vec![Connection::new(ids[0], ids[2])]);
    }

    #[test]
    fn leaving_connect_mode_drops_pending_start() {
        let (mut p, ids) = project_with(1);
        let mut ui = Interaction::new();
        ui.set_connect_mode(true);
        ui.click(&mut p, ids[0]);
        assert_eq!(ui.pending_start(), Some(ids[0]));
        ui.set_connect_mode(false);
        assert_eq!(ui.pending_start(), None);
    }

    #[test]
    fn context_hide_toggles_and_closes_menu() {
        let (mut p, ids) = project_with(1);
        let mut ui = Interaction::new();
        ui.open_context_menu(ids[0]);

        let effect = ui.run_context_action(&mut p, ContextAction::Hide);
        assert_eq!(
            effect,
            Some(ContextEffect::VisibilityToggled {
                tower: ids[0],
                hidden: true
            })
        );
        assert!(!p.is_visible(ids[0]));
        assert_eq!(ui.context_menu(), None);
        assert_eq!(ui.run_context_action(&mut p, ContextAction::Close), None);
    }

    #[test]
    fn context_focus_targets_tower() {
        let (mut p, ids) = project_with(2);
        let mut ui = Interaction::new();
        ui.open_context_menu(ids[1]);
        match ui.run_context_action(&mut p, ContextAction::Focus) {
            Some(ContextEffect::FlyTo { target, zoom, .. }) => {
                assert_eq!(target.lat, 0.003);
                assert_eq!(zoom, 18.0);
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }
}
