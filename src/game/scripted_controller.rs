//! Scripted decision provider for testing and replays
//!
//! Follows a predetermined script of answers. Once the script is exhausted
//! it behaves like [`ZeroController`](crate::game::ZeroController): first
//! option, or the empty subset.

use crate::core::PlayerId;
use crate::game::controller::{
    Constraint, DecisionProvider, DecisionRequest, GameStateView, PromptKind, Selection,
};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;
use std::collections::VecDeque;

/// One scripted answer
///
/// A step tagged with a prompt kind is only used for a request of that
/// kind; untagged steps answer whatever comes next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub kind: Option<PromptKind>,
    pub selection: Selection,
}

impl ScriptStep {
    pub fn any(index: usize) -> Self {
        ScriptStep {
            kind: None,
            selection: Selection::One(index),
        }
    }

    pub fn on(kind: PromptKind, selection: Selection) -> Self {
        ScriptStep {
            kind: Some(kind),
            selection,
        }
    }
}

/// A controller that follows a fixed script of choices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedController {
    player_id: PlayerId,
    script: VecDeque<ScriptStep>,
}

impl ScriptedController {
    /// Script of plain option indices, e.g. `vec![1, 0, 2]`
    ///
    /// On a subset request an index becomes a one-element subset; an
    /// out-of-range index there means "none".
    pub fn new(player_id: PlayerId, indices: Vec<usize>) -> Self {
        Self::with_steps(player_id, indices.into_iter().map(ScriptStep::any).collect())
    }

    pub fn with_steps(player_id: PlayerId, steps: Vec<ScriptStep>) -> Self {
        ScriptedController {
            player_id,
            script: steps.into(),
        }
    }

    /// Scripted answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn fallback(request: &DecisionRequest) -> Selection {
        match request.constraint {
            Constraint::ExactlyOne => Selection::One(0),
            Constraint::AnySubset => Selection::none(),
        }
    }
}

impl DecisionProvider for ScriptedController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn request_choice(&mut self, _view: &GameStateView, request: &DecisionRequest) -> Selection {
        let applies = match self.script.front() {
            Some(step) => step.kind.map_or(true, |kind| kind == request.kind),
            None => false,
        };
        if !applies {
            return Self::fallback(request);
        }
        let Some(step) = self.script.pop_front() else {
            return Self::fallback(request);
        };

        match (request.constraint, step.selection) {
            (Constraint::AnySubset, Selection::One(index)) if index < request.options.len() => {
                Selection::Many(smallvec![index])
            }
            (Constraint::AnySubset, Selection::One(_)) => Selection::none(),
            (_, selection) => selection,
        }
    }
}
