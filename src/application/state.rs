//! # Bot State
//!
//! Transient per-process state: the interactive fitness forms currently open,
//! keyed by (room, user). Forms are not persisted; a restart drops them.

use std::collections::HashMap;

use crate::application::fitness::parse_count;
use crate::domain::error::BotResult;
use crate::domain::types::Workout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStep {
    #[default]
    Pushups,
    Situps,
    Pullups,
    Run,
}

impl FormStep {
    pub fn next(self) -> Option<Self> {
        match self {
            FormStep::Pushups => Some(FormStep::Situps),
            FormStep::Situps => Some(FormStep::Pullups),
            FormStep::Pullups => Some(FormStep::Run),
            FormStep::Run => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FitnessForm {
    pub step: FormStep,
    pub answers: Workout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormProgress {
    Next(FormStep),
    Completed(Workout),
}

#[derive(Debug, Default)]
pub struct BotState {
    forms: HashMap<(String, String), FitnessForm>,
}

impl BotState {
    fn key(room_id: &str, user_id: &str) -> (String, String) {
        (room_id.to_string(), user_id.to_string())
    }

    /// Opens (or restarts) the form for this user in this room.
    pub fn open_form(&mut self, room_id: &str, user_id: &str) -> FormStep {
        self.forms.insert(Self::key(room_id, user_id), FitnessForm::default());
        FormStep::default()
    }

    pub fn has_form(&self, room_id: &str, user_id: &str) -> bool {
        self.forms.contains_key(&Self::key(room_id, user_id))
    }

    pub fn cancel_form(&mut self, room_id: &str, user_id: &str) -> bool {
        self.forms.remove(&Self::key(room_id, user_id)).is_some()
    }

    /// Records one answer. Invalid input closes the form with nothing recorded;
    /// the last valid answer closes it and hands back the workout.
    pub fn answer_form(&mut self, room_id: &str, user_id: &str, input: &str) -> BotResult<Option<FormProgress>> {
        let key = Self::key(room_id, user_id);
        if !self.forms.contains_key(&key) {
            return Ok(None);
        }

        let value = match parse_count(input) {
            Ok(value) => value,
            Err(e) => {
                self.forms.remove(&key);
                return Err(e);
            }
        };

        let Some(form) = self.forms.get_mut(&key) else {
            return Ok(None);
        };

        match form.step {
            FormStep::Pushups => form.answers.pushups = value,
            FormStep::Situps => form.answers.situps = value,
            FormStep::Pullups => form.answers.pullups = value,
            FormStep::Run => form.answers.run_km = value,
        }

        match form.step.next() {
            Some(next) => {
                form.step = next;
                Ok(Some(FormProgress::Next(next)))
            }
            None => {
                let workout = form.answers;
                self.forms.remove(&key);
                Ok(Some(FormProgress::Completed(workout)))
            }
        }
    }
}
