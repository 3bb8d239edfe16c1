//! Named editor commands.
//!
//! Commands are registered once, by name, in a [`CommandRegistry`] and
//! resolved by that name when the host dispatches them. A command is anything
//! with a single `execute` capability over some context; plain closures
//! qualify.

use std::collections::HashMap;

use crate::error::{LookupError, LookupResult};
use crate::session::EditSession;

/// Validates the session's table.
pub const VALIDATE: &str = "validate";
/// Clears every dirty flag.
pub const RESET: &str = "reset";
/// Validates, then records a save.
pub const SAVE: &str = "save";

/// An operation over a context `C`.
pub trait Command<C: ?Sized> {
    /// Runs the command.
    fn execute(&self, ctx: &mut C) -> LookupResult<()>;
}

impl<C: ?Sized, F> Command<C> for F
where
    F: Fn(&mut C) -> LookupResult<()>,
{
    fn execute(&self, ctx: &mut C) -> LookupResult<()> {
        self(ctx)
    }
}

/// Name → command mapping.
pub struct CommandRegistry<C: ?Sized> {
    commands: HashMap<String, Box<dyn Command<C>>>,
}

impl<C: ?Sized> CommandRegistry<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers `command` under `name`. Names are unique.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        command: impl Command<C> + 'static,
    ) -> LookupResult<()> {
        let name = name.into();
        if self.commands.contains_key(&name) {
            return Err(LookupError::DuplicateCommand { name });
        }
        self.commands.insert(name, Box::new(command));
        Ok(())
    }

    /// Runs the command registered under `name`.
    pub fn execute(&self, name: &str, ctx: &mut C) -> LookupResult<()> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| LookupError::UnknownCommand {
                name: name.to_string(),
            })?;
        tracing::debug!(command = name, "executing command");
        command.execute(ctx)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<C: ?Sized> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry<EditSession> {
    /// Registry with the built-in session commands:
    ///
    /// - `validate`: fails with [`LookupError::Invalid`] when the table is invalid;
    /// - `reset`: clears every dirty flag;
    /// - `save`: validates, then records the save. An invalid table is not saved.
    #[must_use]
    pub fn standard() -> Self {
        let mut commands: HashMap<String, Box<dyn Command<EditSession>>> = HashMap::new();
        commands.insert(VALIDATE.to_string(), Box::new(validate_session));
        commands.insert(RESET.to_string(), Box::new(reset_session));
        commands.insert(SAVE.to_string(), Box::new(save_session));
        Self { commands }
    }
}

fn ensure_valid(session: &EditSession) -> LookupResult<()> {
    session
        .validate()
        .into_result()
        .map_err(|result| LookupError::Invalid {
            messages: result.all_messages(),
        })
}

fn validate_session(session: &mut EditSession) -> LookupResult<()> {
    ensure_valid(session)
}

fn reset_session(session: &mut EditSession) -> LookupResult<()> {
    session.reset_modified();
    Ok(())
}

fn save_session(session: &mut EditSession) -> LookupResult<()> {
    ensure_valid(session)?;
    session.mark_saved();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{Property, PropertyField};
    use crate::table::LookupTable;

    fn make_session(action: &str) -> EditSession {
        EditSession::new(
            LookupTable::builder()
                .action_name(action)
                .property(
                    Property::builder()
                        .name("Size")
                        .display_name("Size")
                        .value("10")
                        .build(),
                )
                .build(),
        )
    }

    #[test]
    fn test_register_and_execute_closure() {
        let mut registry: CommandRegistry<Vec<String>> = CommandRegistry::new();
        registry
            .register("push", |log: &mut Vec<String>| -> LookupResult<()> {
                log.push("ran".to_string());
                Ok(())
            })
            .unwrap();

        let mut log = Vec::new();
        registry.execute("push", &mut log).unwrap();
        assert_eq!(log, vec!["ran"]);
        assert!(registry.contains("push"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry: CommandRegistry<u32> = CommandRegistry::new();
        registry
            .register("inc", |n: &mut u32| -> LookupResult<()> {
                *n += 1;
                Ok(())
            })
            .unwrap();
        let err = registry
            .register("inc", |_: &mut u32| -> LookupResult<()> { Ok(()) })
            .unwrap_err();
        assert!(matches!(err, LookupError::DuplicateCommand { .. }));
    }

    #[test]
    fn test_unknown_command() {
        let registry: CommandRegistry<u32> = CommandRegistry::default();
        assert!(registry.is_empty());
        let err = registry.execute("missing", &mut 0).unwrap_err();
        assert!(matches!(err, LookupError::UnknownCommand { ref name } if name == "missing"));
    }

    #[test]
    fn test_standard_names() {
        let registry = CommandRegistry::standard();
        assert_eq!(registry.names(), vec![RESET, SAVE, VALIDATE]);
    }

    #[test]
    fn test_save_refuses_invalid_table() {
        let registry = CommandRegistry::standard();
        let mut session = make_session("");
        session.set_description("changed");

        let err = registry.execute(SAVE, &mut session).unwrap_err();
        assert!(err.is_invalid());
        assert!(session.is_modified());
        assert!(session.last_saved_at().is_none());
    }

    #[test]
    fn test_save_and_reset() {
        let registry = CommandRegistry::standard();
        let mut session = make_session("A1");

        session.set_property_field(0, PropertyField::Value, "11").unwrap();
        registry.execute(RESET, &mut session).unwrap();
        assert!(!session.is_modified());
        assert!(session.has_unsaved_changes());

        registry.execute(VALIDATE, &mut session).unwrap();
        registry.execute(SAVE, &mut session).unwrap();
        assert!(!session.has_unsaved_changes());
    }
}
