//! Action registry: action names mapped to handlers and help text.

use std::fmt::Write;

use classmap_cache::CacheVariant;

use crate::Cli;

/// Signature every action handler implements. The returned value is the
/// process exit code.
pub type Handler = fn(&Cli, &ActionRegistry) -> Result<i32, Box<dyn std::error::Error>>;

/// One registered action.
pub struct Action {
    /// Value of `--action` that selects this action.
    pub name: &'static str,
    /// Arguments shown after the action in usage text.
    pub args: &'static str,
    /// One-line description.
    pub help: &'static str,
    /// The handler.
    pub handler: Handler,
}

/// Actions in registration order.
#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<Action>,
}

impl ActionRegistry {
    /// The built-in actions.
    pub fn standard() -> Self {
        let mut registry = Self::default();
        registry.register(Action {
            name: "generate",
            args: "--type <type> [--output <file>]",
            help: "Scan the source tree and write the class path cache",
            handler: crate::generate::run,
        });
        registry.register(Action {
            name: "clear",
            args: "",
            help: "Delete the class path cache",
            handler: crate::clear::run,
        });
        registry.register(Action {
            name: "lookup",
            args: "--name <type name>...",
            help: "Resolve type names through the cache and fallback search",
            handler: crate::lookup::run,
        });
        registry.register(Action {
            name: "info",
            args: "",
            help: "Describe the current class path cache",
            handler: crate::info::run,
        });
        registry
    }

    /// Adds an action. Of two actions with the same name, the first
    /// registered is the one found.
    pub fn register(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Finds the action called `name`.
    pub fn find(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// Usage text listing every action and cache type.
    pub fn usage(&self) -> String {
        let lines: Vec<(String, &str)> = self
            .actions
            .iter()
            .map(|a| {
                let mut invocation = format!("--action {}", a.name);
                if !a.args.is_empty() {
                    invocation.push(' ');
                    invocation.push_str(a.args);
                }
                (invocation, a.help)
            })
            .collect();
        let width = lines.iter().map(|(inv, _)| inv.len()).max().unwrap_or(0);

        let mut out = String::from("Usage: classmap --action <action> [options]\n\nActions:\n");
        for (invocation, help) in &lines {
            let _ = writeln!(out, "  {invocation:<width$}  {help}");
        }
        let types: Vec<&str> = CacheVariant::ALL.iter().map(|v| v.name()).collect();
        let _ = writeln!(out, "\nCache types: {}", types.join(", "));
        out.push_str(
            "\nOptions:\n  --base-dir <dir>  --config <file>  --format text|json  -v  -q\n",
        );
        out
    }
}
