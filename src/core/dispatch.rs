//! Dispatcher - resolves `<group> <command> [args...]` and runs the command
//!
//! Resolution order within a group: exact command name across every bound
//! collection, then exact alias. Nothing else resolves; a case-insensitive
//! match is only offered back as a suggestion.

use crate::backend::Backend;
use crate::core::collection::CommandsCollection;
use crate::core::command::{Command, ExecutionContext, ExecutionOutcome};
use crate::core::config::Config;
use crate::core::error::{CliResult, ResolutionError};
use crate::core::registry::{CommandGroup, Registry};

/// One parsed CLI invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub group: String,
    pub command: String,
    pub args: Vec<String>,
}

impl InvocationRequest {
    pub fn new(group: impl Into<String>, command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            group: group.into(),
            command: command.into(),
            args,
        }
    }
}

/// A resolved command together with where it was found
#[derive(Debug)]
pub struct Resolved<'r, C> {
    pub group: &'r CommandGroup,
    pub collection: &'r CommandsCollection<C>,
    pub command: &'r C,
}

/// Where commands run and on whose behalf
pub struct Target<'a> {
    pub backend: &'a dyn Backend,
    pub config: &'a Config,
    /// Contract address overriding the configured one
    pub contract: Option<&'a str>,
}

pub struct Dispatcher<'r, C> {
    registry: &'r Registry<C>,
}

impl<'r, C: Command> Dispatcher<'r, C> {
    pub fn new(registry: &'r Registry<C>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry<C> {
        self.registry
    }

    /// Resolve a command token within a group
    pub fn resolve(&self, group: &str, token: &str) -> Result<Resolved<'r, C>, ResolutionError> {
        let registry = self.registry;
        let group = registry.group(group)?;
        let collections: Vec<&'r CommandsCollection<C>> = registry.collections_of(group).collect();

        let by_name = collections
            .iter()
            .find_map(|&c| c.find_by_name(token).map(|cmd| (c, cmd)));
        let found = by_name.or_else(|| {
            collections
                .iter()
                .find_map(|&c| c.find_by_alias(token).map(|cmd| (c, cmd)))
        });

        if let Some((collection, command)) = found {
            return Ok(Resolved {
                group,
                collection,
                command,
            });
        }

        let valid: Vec<String> = collections
            .iter()
            .flat_map(|c| c.names())
            .chain(collections.iter().flat_map(|c| c.aliases()))
            .map(str::to_string)
            .collect();
        let suggestion = valid
            .iter()
            .find(|option| option.eq_ignore_ascii_case(token))
            .cloned();

        Err(ResolutionError::UnknownCommand {
            group: group.name.to_string(),
            token: token.to_string(),
            valid,
            suggestion,
        })
    }

    /// Resolve the request and execute it against `target`
    pub fn dispatch(
        &self,
        request: &InvocationRequest,
        target: &Target<'_>,
    ) -> CliResult<ExecutionOutcome> {
        let resolved = self.resolve(&request.group, &request.command)?;
        tracing::debug!(
            group = resolved.group.name,
            collection = resolved.collection.name(),
            command = resolved.command.name(),
            "resolved command"
        );

        let ctx = ExecutionContext {
            backend: target.backend,
            group: resolved.group.name,
            collection: resolved.collection.name(),
            call: target
                .config
                .call_context(resolved.collection.name(), target.contract),
        };
        resolved.command.execute(&request.args, &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::RecordingBackend;
    use crate::core::command::ContractCommand;
    use crate::core::error::{CliError, EXIT_BACKEND, EXIT_RESOLUTION, EXIT_VALIDATION};
    use serde_json::{json, Value};

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn run(
        registry: &Registry<ContractCommand>,
        backend: &RecordingBackend,
        group: &str,
        command: &str,
        raw: &[&str],
    ) -> CliResult<ExecutionOutcome> {
        let config = Config::default();
        Dispatcher::new(registry).dispatch(
            &InvocationRequest::new(group, command, args(raw)),
            &Target {
                backend,
                config: &config,
                contract: None,
            },
        )
    }

    #[test]
    fn test_transfer_reaches_backend_once() {
        let registry = Registry::builtin().unwrap();
        let backend = RecordingBackend::succeeding(json!({"status": "mined"}));

        let outcome = run(&registry, &backend, "token", "Transfer", &["--to", "0xABC", "--amount", "100"])
            .unwrap();

        assert_eq!(backend.call_count(), 1);
        let call = &backend.calls()[0];
        assert_eq!(call.collection, "CAT-20");
        assert_eq!(Value::Object(call.params.clone()), json!({"to": "0xABC", "amount": 100}));
        assert_eq!(outcome.command, "Transfer");
    }

    #[test]
    fn test_group_alias_and_command_alias_resolve() {
        let registry = Registry::builtin().unwrap();
        let dispatcher = Dispatcher::new(&registry);

        let by_alias = dispatcher.resolve("T", "tr").unwrap();
        let by_name = dispatcher.resolve("token", "Transfer").unwrap();
        assert!(std::ptr::eq(by_alias.command, by_name.command));
        assert_eq!(by_alias.group.name, "token");
    }

    #[test]
    fn test_unknown_command_lists_collection_options() {
        let registry = Registry::builtin().unwrap();
        let backend = RecordingBackend::succeeding(json!(null));

        let err = run(&registry, &backend, "symbolRegistry", "UnknownCmd", &[]).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_RESOLUTION);
        assert_eq!(backend.call_count(), 0);

        match err {
            CliError::Resolution(e) => {
                let valid = e.valid_options();
                for name in ["SetPolicy", "GetPolicy", "SetPolicyWithId"] {
                    assert!(valid.iter().any(|v| v == name), "{} missing from {:?}", name, valid);
                }
            }
            other => panic!("expected resolution error, got {:?}", other),
        }
    }

    #[test]
    fn test_case_mismatch_is_suggested_not_resolved() {
        let registry = Registry::builtin().unwrap();
        let err = Dispatcher::new(&registry).resolve("token", "transfer").unwrap_err();
        match err {
            ResolutionError::UnknownCommand { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("Transfer"));
            }
            other => panic!("expected unknown command, got {:?}", other),
        }
    }

    #[test]
    fn test_prefix_does_not_resolve() {
        let registry = Registry::builtin().unwrap();
        assert!(Dispatcher::new(&registry).resolve("token", "Tran").is_err());
    }

    #[test]
    fn test_missing_parameter_never_calls_backend() {
        let registry = Registry::builtin().unwrap();
        let backend = RecordingBackend::succeeding(json!(null));

        let err = run(&registry, &backend, "token", "Mint", &["--to", "0x1"]).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_VALIDATION);
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_backend_rejection_surfaces_code() {
        let registry = Registry::builtin().unwrap();
        let backend = RecordingBackend::failing("NOT_ALLOWED", "rollbacks are disabled");

        let err = run(&registry, &backend, "token", "Rollback", &[]).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_BACKEND);
        assert!(err.to_string().contains("NOT_ALLOWED"));
        assert_eq!(backend.calls()[0].method, "rollbackTransaction");
    }

    #[test]
    fn test_name_beats_alias_across_collections() {
        const SHARED: CommandGroup = CommandGroup {
            name: "shared",
            aliases: &[],
            description: "",
            collections: &["first", "second"],
        };
        let first = CommandsCollection::new(
            "first",
            "",
            vec![ContractCommand::new("Status", "statusA").with_alias("Info")],
        )
        .unwrap();
        let second =
            CommandsCollection::new("second", "", vec![ContractCommand::new("Info", "infoB")]).unwrap();
        let registry = Registry::new(vec![SHARED], vec![first, second]).unwrap();
        let dispatcher = Dispatcher::new(&registry);

        let resolved = dispatcher.resolve("shared", "Info").unwrap();
        assert_eq!(resolved.collection.name(), "second");
        assert_eq!(resolved.command.target.as_deref(), Some("infoB"));
    }

    #[test]
    fn test_contract_override_reaches_backend() {
        let registry = Registry::builtin().unwrap();
        let backend = RecordingBackend::succeeding(json!(true));
        let mut config = Config::default();
        config.contracts.insert("CAT-20".to_string(), "0x01".to_string());

        let request = InvocationRequest::new("T", "pause", vec![]);
        let dispatcher = Dispatcher::new(&registry);
        dispatcher
            .dispatch(&request, &Target { backend: &backend, config: &config, contract: None })
            .unwrap();
        dispatcher
            .dispatch(&request, &Target { backend: &backend, config: &config, contract: Some("0x02") })
            .unwrap();

        let calls = backend.calls();
        assert_eq!(calls[0].context.contract.as_deref(), Some("0x01"));
        assert_eq!(calls[1].context.contract.as_deref(), Some("0x02"));
    }
}
