use crate::command::CommandDescriptor;
use crate::orchestrator::{ArchiveDepth, Orchestrator};
use crate::router::CommandRouter;

use super::handlers;

const IDENT: &str = "Job identifier";
const PARAMETERS: &str = "Optional job parameters";

fn with_ident(name: &str, description: &str) -> CommandDescriptor {
    CommandDescriptor::new(name, description).string("ident", IDENT, true)
}

/// Returns the descriptors of every built-in command, in registration order.
pub fn catalog() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new("archive", "Queue a URL for archival")
            .string("url", "URL to archive", true)
            .string("parameters", PARAMETERS, false),
        CommandDescriptor::new("archive_file", "Queue URLs from a file for archival")
            .string("url", "URL pointing to the list of URLs", true)
            .string("parameters", PARAMETERS, false),
        CommandDescriptor::new("archiveonly", "Queue a URL without recursion")
            .string("url", "URL to archive without recursion", true)
            .string("parameters", PARAMETERS, false),
        CommandDescriptor::new("archiveonly_file", "Queue URLs from a file without recursion")
            .string("url", "URL pointing to the list of URLs", true)
            .string("parameters", PARAMETERS, false),
        CommandDescriptor::new("status", "Show the status for a job or URL")
            .string("ident", IDENT, false)
            .string("url", "URL previously queued for archival", false),
        with_ident("ignore", "Add an ignore pattern to a job").string("pattern", "Pattern to add", true),
        with_ident("unignore", "Remove an ignore pattern from a job")
            .string("pattern", "Pattern to remove", true),
        with_ident("ignoreset", "Apply ignore sets to a job")
            .string("sets", "Comma separated set names", true),
        with_ident("expire", "Expire a job"),
        with_ident("set_delay", "Set delay bounds for a job")
            .integer("min", "Minimum delay in milliseconds", true)
            .integer("max", "Maximum delay in milliseconds", true),
        with_ident("set_concurrency", "Set concurrency for a job")
            .integer("level", "Number of concurrent workers", true),
        with_ident("yahoo", "Enable Yahoo! mode for a job"),
        with_ident("abort", "Abort a job"),
        with_ident("ignore_reports", "Toggle ignore pattern reports for a job")
            .boolean("enabled", "Enable reports (true) or suppress them (false)", true),
        CommandDescriptor::new("pending", "List pending jobs"),
        with_ident("explain", "Add a rationale to a job").string("note", "Explanation to record", true),
        with_ident("whereis", "Show which pipeline is handling a job"),
    ]
}

/// Returns a router with a handler bound for every command in [`catalog`].
pub fn catalog_router<O: Orchestrator>() -> CommandRouter<O> {
    use ArchiveDepth::{Recursive, Shallow};

    CommandRouter::new()
        .route("archive", |o, inv| handlers::archive(o, inv, Recursive, false))
        .route("archive_file", |o, inv| handlers::archive(o, inv, Recursive, true))
        .route("archiveonly", |o, inv| handlers::archive(o, inv, Shallow, false))
        .route("archiveonly_file", |o, inv| handlers::archive(o, inv, Shallow, true))
        .route("status", handlers::status::<O>)
        .route("ignore", handlers::ignore::<O>)
        .route("unignore", handlers::unignore::<O>)
        .route("ignoreset", handlers::ignoreset::<O>)
        .route("expire", handlers::expire::<O>)
        .route("set_delay", handlers::set_delay::<O>)
        .route("set_concurrency", handlers::set_concurrency::<O>)
        .route("yahoo", handlers::yahoo::<O>)
        .route("abort", handlers::abort::<O>)
        .route("ignore_reports", handlers::ignore_reports::<O>)
        .route("pending", handlers::pending::<O>)
        .route("explain", handlers::explain::<O>)
        .route("whereis", handlers::whereis::<O>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handlers::tests::MockOrchestrator;

    #[test]
    fn test_every_descriptor_is_valid() {
        for descriptor in catalog() {
            assert!(descriptor.validate().is_ok(), "{}", descriptor.name());
        }
    }

    #[test]
    fn test_router_covers_the_catalog() {
        let router = catalog_router::<MockOrchestrator>();
        let mut names: Vec<_> = catalog().iter().map(|d| d.name().to_string()).collect();
        names.sort_unstable();

        assert_eq!(names.len(), 17);
        assert_eq!(router.names(), names);
    }

    #[test]
    fn test_stable_option_names() {
        let catalog = catalog();
        let set_delay = catalog.iter().find(|d| d.name() == "set_delay").unwrap();
        let options: Vec<_> = set_delay.options().iter().map(|o| o.name.as_str()).collect();

        assert_eq!(options, ["ident", "min", "max"]);
        assert!(catalog.iter().find(|d| d.name() == "pending").unwrap().options().is_empty());
    }
}
