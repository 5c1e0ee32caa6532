//! Subcommand handlers
//!
//! Edits go through the optimistic coordinator, exactly as an interactive
//! front end would drive it, over the in-process store service.

use crate::config::AppConfig;
use crate::render::render_tree;
use anyhow::{bail, Context};
use clap::ArgMatches;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tagtree_model::{parse_tree, Branch, LeafPatch, Node, NodeId, TreeId};
use tagtree_selection::{SelectionSession, TargetStatus};
use tagtree_store::{generate_tree, DocumentStore, GenerateOptions, TreeService};
use tagtree_sync::OptimisticCoordinator;

type Service = TreeService<dyn DocumentStore>;

/// Store service plus coordinator for one invocation
pub struct App {
    service: Arc<Service>,
    coordinator: OptimisticCoordinator<Service>,
}

impl App {
    /// Open the configured store
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        let service: Arc<Service> = Arc::new(TreeService::new(config.store.open()));
        let coordinator = OptimisticCoordinator::with_config(Arc::clone(&service), config.sync.clone());
        Self {
            service,
            coordinator,
        }
    }

    /// Run the selected subcommand and return its output
    ///
    /// # Errors
    /// Any store, transport or input error, with context.
    pub async fn execute(&self, matches: &ArgMatches) -> anyhow::Result<String> {
        match matches.subcommand() {
            Some(("seed", args)) => self.seed(args).await,
            Some(("list", _)) => self.list().await,
            Some(("show", args)) => self.show(args).await,
            Some(("delete", args)) => self.delete(args).await,
            Some(("update-leaf", args)) => self.update_leaf(args).await,
            Some(("select", args)) => self.select(args).await,
            _ => bail!("no subcommand given, see --help"),
        }
    }

    async fn seed(&self, args: &ArgMatches) -> anyhow::Result<String> {
        let doc = match args.get_one::<PathBuf>("file") {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("cannot read {}", path.display()))?;
                parse_tree(&raw).with_context(|| format!("in {}", path.display()))?
            }
            None => {
                let options = GenerateOptions {
                    branching: arg(args, "branching")?,
                    depth: arg(args, "depth")?,
                    leaves: arg(args, "leaves")?,
                };
                generate_tree(&arg::<String>(args, "id")?, &options)?
            }
        };
        let tree = self.service.seed(&doc).await?;
        Ok(format!("seeded {tree} ({} nodes)\n", doc.node_count()))
    }

    async fn list(&self) -> anyhow::Result<String> {
        let ids = self.service.list().await?;
        Ok(ids.iter().map(|id| format!("{id}\n")).collect())
    }

    async fn show(&self, args: &ArgMatches) -> anyhow::Result<String> {
        let tree = self.coordinator.load(&tree_arg(args)?).await?;
        if args.get_flag("json") {
            let mut json = serde_json::to_string_pretty(&Node::Branch((*tree).clone()))?;
            json.push('\n');
            return Ok(json);
        }
        Ok(render_tree(&tree, None))
    }

    async fn delete(&self, args: &ArgMatches) -> anyhow::Result<String> {
        let tree = tree_arg(args)?;
        let ids: BTreeSet<NodeId> = args
            .get_many::<String>("ids")
            .into_iter()
            .flatten()
            .map(|s| NodeId::from(s.as_str()))
            .collect();
        self.remove(&tree, ids).await
    }

    async fn update_leaf(&self, args: &ArgMatches) -> anyhow::Result<String> {
        let tree = tree_arg(args)?;
        let leaf = arg::<String>(args, "leaf")?;

        let mut patch = LeafPatch::new();
        if let Some(name) = args.get_one::<String>("name") {
            patch = patch.name(name);
        }
        if let Some(info) = args.get_one::<String>("secondary") {
            patch = patch.secondary_information(info);
        }
        if let Some(flag) = args.get_one::<bool>("training") {
            patch = patch.is_training(*flag);
        }
        if patch.is_empty() {
            bail!("nothing to update: give --name, --secondary or --training");
        }

        let current = self.coordinator.load(&tree).await?;
        if current.find(&leaf).and_then(Node::as_leaf).is_none() {
            tracing::warn!("Leaf {} not found in {}, update is a no-op", leaf, tree);
        }
        let outcome = self.coordinator.update_leaf(&tree, leaf.as_str(), patch).await?;
        Ok(format!("{} committed: leaf {leaf} updated\n", outcome.id))
    }

    async fn select(&self, args: &ArgMatches) -> anyhow::Result<String> {
        let tree = tree_arg(args)?;
        let current = self.coordinator.load(&tree).await?;
        let mut session = SelectionSession::new(current);

        for (id, status) in toggles(args) {
            session.toggle(&id, status);
        }

        let roots = session.checked_roots();
        let mut out = render_tree(session.tree(), Some(session.selection()));
        let listed: Vec<&str> = roots.iter().map(NodeId::as_str).collect();
        out.push_str(&format!("checked roots: [{}]\n", listed.join(", ")));

        if args.get_flag("delete") && !roots.is_empty() {
            let ids = deletable(session.tree(), roots);
            out.push_str(&self.remove(&tree, ids).await?);
        }
        Ok(out)
    }

    async fn remove(&self, tree: &TreeId, ids: BTreeSet<NodeId>) -> anyhow::Result<String> {
        if ids.is_empty() {
            bail!("no node ids given");
        }
        self.coordinator.load(tree).await?;
        let count = ids.len();
        let outcome = self.coordinator.delete_nodes(tree, ids).await?;
        let leaves = self
            .coordinator
            .cached(tree)
            .and_then(|t| t.count)
            .unwrap_or_default();
        Ok(format!(
            "{} committed: removed {count} node(s), {leaves} leaves left\n",
            outcome.id
        ))
    }
}

/// Selection toggles in command line order
fn toggles(args: &ArgMatches) -> Vec<(String, TargetStatus)> {
    let mut ordered = Vec::new();
    for (name, status) in [("check", TargetStatus::Checked), ("uncheck", TargetStatus::Unchecked)] {
        let (Some(indices), Some(values)) = (args.indices_of(name), args.get_many::<String>(name))
        else {
            continue;
        };
        ordered.extend(indices.zip(values).map(|(i, id)| (i, id.clone(), status)));
    }
    ordered.sort_by_key(|(i, _, _)| *i);
    ordered.into_iter().map(|(_, id, status)| (id, status)).collect()
}

/// A fully checked tree cannot lose its root; delete its children instead
fn deletable(tree: &Branch, roots: Vec<NodeId>) -> BTreeSet<NodeId> {
    if roots.iter().any(|id| *id == tree.id) {
        tree.children.iter().map(|c| c.id().clone()).collect()
    } else {
        roots.into_iter().collect()
    }
}

fn tree_arg(args: &ArgMatches) -> anyhow::Result<TreeId> {
    arg::<String>(args, "tree").map(TreeId::from)
}

fn arg<T: Clone + Send + Sync + 'static>(args: &ArgMatches, name: &str) -> anyhow::Result<T> {
    args.get_one::<T>(name)
        .cloned()
        .with_context(|| format!("missing argument <{name}>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagtree_test_utils::sample_tree;

    #[test]
    fn toggles_keep_command_line_order() {
        let matches = crate::cli()
            .try_get_matches_from([
                "tagtree", "select", "t", "--check", "a", "--uncheck", "b", "--check", "c",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let order: Vec<(String, TargetStatus)> = toggles(args);
        assert_eq!(
            order,
            vec![
                ("a".to_string(), TargetStatus::Checked),
                ("b".to_string(), TargetStatus::Unchecked),
                ("c".to_string(), TargetStatus::Checked),
            ]
        );
    }

    #[test]
    fn checked_root_expands_to_children() {
        let tree = sample_tree();
        let ids = deletable(&tree, vec![NodeId::from("root")]);
        assert_eq!(ids, BTreeSet::from([NodeId::from("a")]));

        let ids = deletable(&tree, vec![NodeId::from("b"), NodeId::from("c")]);
        assert_eq!(ids.len(), 2);
    }
}
