//! Capability table and argv construction.
//!
//! Every `(mode, action)` pair maps to at most one [`Capability`]: an argv
//! template plus the confirmation/prompt requirements the caller must honour.
//! Building never touches the system; it only validates inputs and fills the
//! template.

use serde::Serialize;
use std::fmt;

use crate::error::{ZfsError, ZfsResult};
use crate::zfs::mode::{Action, ResourceMode, Tool};

const ZFS_LIST_COLUMNS: &str = "name,used,avail,volsize,mountpoint";
const ZPOOL_LIST_COLUMNS: &str = "name,alloc,free,size,health";

/// Ordered argv tokens. Never joined into a shell string for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommandSpec {
    argv: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or("")
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    pub fn tool(&self) -> Option<Tool> {
        Tool::from_program(self.program())
    }
}

/// Shell-quoted rendering, for logs and error messages only.
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_words::join(&self.argv))
    }
}

/// Free-form text collected by the shell for an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UserInput {
    #[default]
    None,
    /// New name, snapshot name or clone name.
    Name(String),
    /// Name and size for `zfs create -V`.
    Volume { name: String, size: String },
}

impl UserInput {
    pub fn name(&self) -> Option<&str> {
        match self {
            UserInput::None => None,
            UserInput::Name(name) | UserInput::Volume { name, .. } => Some(name.as_str()),
        }
    }

    pub fn size(&self) -> Option<&str> {
        match self {
            UserInput::Volume { size, .. } => Some(size.as_str()),
            _ => None,
        }
    }
}

/// Placeholder or literal inside an argv template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Lit(&'static str),
    /// The selected resource name.
    Target,
    /// `UserInput::name`.
    Input,
    /// `UserInput::size`.
    Size,
}

/// One enabled cell of the capability table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub mode: ResourceMode,
    pub action: Action,
    pub tool: Tool,
    pub template: &'static [Token],
    /// A selected object must exist, even when the argv does not name it
    /// (`zfs snapshot <input>` still acts on the selection).
    pub requires_target: bool,
    /// Caller must obtain an explicit yes before building.
    pub confirm: bool,
    /// Label for the free-form text prompt, when the action needs one.
    pub prompt: Option<&'static str>,
}

impl Capability {
    pub fn needs_target(&self) -> bool {
        self.requires_target
    }

    pub fn needs_input(&self) -> bool {
        self.template.contains(&Token::Input)
    }

    pub fn needs_size(&self) -> bool {
        self.template.contains(&Token::Size)
    }

    /// Human-readable template, e.g. `zfs rename <target> <input>`.
    pub fn usage(&self) -> String {
        let mut parts = vec![self.tool.as_str().to_string()];
        for token in self.template {
            parts.push(match token {
                Token::Lit(s) => (*s).to_string(),
                Token::Target => "<target>".into(),
                Token::Input => "<input>".into(),
                Token::Size => "<size>".into(),
            });
        }
        parts.join(" ")
    }
}

use Token::{Input, Lit, Size, Target};

const CREATE: &[Token] = &[Lit("create"), Input];
const CREATE_VOLUME: &[Token] = &[Lit("create"), Lit("-V"), Size, Input];
const RENAME: &[Token] = &[Lit("rename"), Target, Input];
const SNAPSHOT: &[Token] = &[Lit("snapshot"), Input];
const CLONE: &[Token] = &[Lit("clone"), Target, Input];
const PROMOTE: &[Token] = &[Lit("promote"), Target];
const DESTROY: &[Token] = &[Lit("destroy"), Target];
const ROLLBACK: &[Token] = &[Lit("rollback"), Target];
const GET_ALL: &[Token] = &[Lit("get"), Lit("all"), Target];
const LIST_FILESYSTEMS: &[Token] = &[
    Lit("list"),
    Lit("-o"),
    Lit(ZFS_LIST_COLUMNS),
    Lit("-t"),
    Lit("filesystem"),
];
const LIST_SNAPSHOTS: &[Token] = &[
    Lit("list"),
    Lit("-o"),
    Lit(ZFS_LIST_COLUMNS),
    Lit("-t"),
    Lit("snapshot"),
];
const LIST_VOLUMES: &[Token] = &[
    Lit("list"),
    Lit("-o"),
    Lit(ZFS_LIST_COLUMNS),
    Lit("-t"),
    Lit("volume"),
];
const LIST_POOLS: &[Token] = &[Lit("list"), Lit("-o"), Lit(ZPOOL_LIST_COLUMNS)];

/// Look up the capability table. `None` means the shell must not offer the action.
pub fn capability(mode: ResourceMode, action: Action) -> Option<Capability> {
    use Action as A;
    use ResourceMode as M;

    let (template, confirm, prompt): (&'static [Token], bool, Option<&'static str>) =
        match (mode, action) {
            (M::Dataset, A::List) => (LIST_FILESYSTEMS, false, None),
            (M::Snapshot, A::List) => (LIST_SNAPSHOTS, false, None),
            (M::Volume, A::List) => (LIST_VOLUMES, false, None),
            (M::Pool, A::List) => (LIST_POOLS, false, None),

            (M::Dataset, A::Create) => (CREATE, false, Some("dataset name")),
            (M::Volume, A::Create) => (CREATE_VOLUME, false, Some("volume name")),

            (_, A::Rename) => (RENAME, false, Some("new name")),

            (M::Dataset | M::Volume, A::Duplicate) => (SNAPSHOT, false, Some("snapshot name")),
            (M::Snapshot, A::Duplicate) => (CLONE, false, Some("clone name")),

            (M::Dataset | M::Snapshot | M::Volume, A::Promote) => (PROMOTE, true, None),
            (_, A::Destroy) => (DESTROY, true, None),
            (M::Snapshot, A::Rollback) => (ROLLBACK, true, None),
            (_, A::GetProperties) => (GET_ALL, false, None),

            _ => return None,
        };

    Some(Capability {
        mode,
        action,
        tool: mode.tool(),
        template,
        requires_target: !matches!(action, A::Create | A::List),
        confirm,
        prompt,
    })
}

/// All enabled capabilities for a mode, in `Action::variants()` order.
pub fn capabilities(mode: ResourceMode) -> Vec<Capability> {
    Action::variants()
        .iter()
        .filter_map(|action| capability(mode, *action))
        .collect()
}

/// Build the argv for `(mode, action)`. Confirmation is the caller's concern.
///
/// Target and input are used verbatim; only blank values are rejected.
pub fn build(
    mode: ResourceMode,
    action: Action,
    target: &str,
    input: &UserInput,
) -> ZfsResult<CommandSpec> {
    let cap = capability(mode, action).ok_or(ZfsError::Unsupported { mode, action })?;

    if cap.requires_target && target.trim().is_empty() {
        return Err(ZfsError::NoTarget { action });
    }

    let name = input.name().unwrap_or("");
    if cap.needs_input() && name.trim().is_empty() {
        return Err(ZfsError::MissingInput {
            action,
            field: cap.prompt.unwrap_or("name"),
        });
    }

    let size = input.size().unwrap_or("");
    if cap.needs_size() && size.trim().is_empty() {
        return Err(ZfsError::MissingInput {
            action,
            field: "volume size",
        });
    }

    let mut argv = Vec::with_capacity(cap.template.len() + 1);
    argv.push(cap.tool.as_str().to_string());
    for token in cap.template {
        argv.push(match token {
            Lit(s) => (*s).to_string(),
            Target => target.to_string(),
            Input => name.to_string(),
            Size => size.to_string(),
        });
    }
    Ok(CommandSpec { argv })
}

/// Listing command for a mode (always defined).
pub fn list_command(mode: ResourceMode) -> CommandSpec {
    let template = capability(mode, Action::List)
        .map(|cap| cap.template)
        .unwrap_or(LIST_FILESYSTEMS);
    let mut argv = vec![mode.tool().as_str().to_string()];
    argv.extend(template.iter().filter_map(|token| match token {
        Lit(s) => Some((*s).to_string()),
        _ => None,
    }));
    CommandSpec { argv }
}

/// Pre-filled value for the action's text prompt, given the current selection.
pub fn suggested_input(mode: ResourceMode, action: Action, selected: &str) -> Option<String> {
    let selected = selected.trim();
    capability(mode, action)?.prompt?;
    match (mode, action) {
        (ResourceMode::Dataset, Action::Create) if !selected.is_empty() => {
            Some(format!("{selected}/"))
        }
        (ResourceMode::Dataset | ResourceMode::Volume, Action::Duplicate) if !selected.is_empty() => {
            Some(format!("{selected}@"))
        }
        (ResourceMode::Snapshot, Action::Duplicate) | (_, Action::Rename)
            if !selected.is_empty() =>
        {
            Some(selected.to_string())
        }
        _ => None,
    }
}

/* ---- Tests ---- */
#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> UserInput {
        UserInput::Name(s.into())
    }

    #[test]
    fn pool_list_argv() {
        let spec = build(ResourceMode::Pool, Action::List, "", &UserInput::None).unwrap();
        assert_eq!(
            spec.argv(),
            ["zpool", "list", "-o", "name,alloc,free,size,health"]
        );
        assert_eq!(list_command(ResourceMode::Pool), spec);
    }

    #[test]
    fn zfs_list_argv_per_mode() {
        for (mode, ty) in [
            (ResourceMode::Dataset, "filesystem"),
            (ResourceMode::Snapshot, "snapshot"),
            (ResourceMode::Volume, "volume"),
        ] {
            let spec = list_command(mode);
            assert_eq!(
                spec.argv(),
                [
                    "zfs",
                    "list",
                    "-o",
                    "name,used,avail,volsize,mountpoint",
                    "-t",
                    ty
                ]
            );
            assert_eq!(spec.argv().last().map(String::as_str), mode.list_type());
        }
    }

    #[test]
    fn capability_matrix() {
        use Action as A;
        use ResourceMode as M;
        let enabled = |m, a| capability(m, a).is_some();

        assert!(enabled(M::Dataset, A::Create));
        assert!(!enabled(M::Snapshot, A::Create));
        assert!(enabled(M::Volume, A::Create));
        assert!(!enabled(M::Pool, A::Create));

        assert!(!enabled(M::Pool, A::Duplicate));
        assert!(!enabled(M::Pool, A::Promote));
        assert!(enabled(M::Pool, A::Destroy));

        for m in ResourceMode::variants() {
            assert_eq!(enabled(*m, A::Rollback), *m == M::Snapshot);
            assert!(enabled(*m, A::Rename));
            assert!(enabled(*m, A::GetProperties));
            assert!(enabled(*m, A::List));
        }
    }

    #[test]
    fn confirmation_flags() {
        for m in ResourceMode::variants() {
            for cap in capabilities(*m) {
                let expected = matches!(
                    cap.action,
                    Action::Promote | Action::Destroy | Action::Rollback
                );
                assert_eq!(cap.confirm, expected, "{m} {}", cap.action);
            }
        }
    }

    #[test]
    fn rollback_on_dataset_is_unsupported() {
        let err = build(ResourceMode::Dataset, Action::Rollback, "tank@a", &UserInput::None)
            .unwrap_err();
        assert!(matches!(
            err,
            ZfsError::Unsupported {
                mode: ResourceMode::Dataset,
                action: Action::Rollback
            }
        ));
    }

    #[test]
    fn create_takes_input_literally() {
        let spec = build(
            ResourceMode::Dataset,
            Action::Create,
            "tank/data",
            &name("tank/data/child"),
        )
        .unwrap();
        assert_eq!(spec.argv(), ["zfs", "create", "tank/data/child"]);

        let spec = build(ResourceMode::Dataset, Action::Create, "tank/data", &name("child")).unwrap();
        assert_eq!(spec.argv(), ["zfs", "create", "child"]);
    }

    #[test]
    fn create_volume_needs_size() {
        let spec = build(
            ResourceMode::Volume,
            Action::Create,
            "",
            &UserInput::Volume {
                name: "tank/vol1".into(),
                size: "10G".into(),
            },
        )
        .unwrap();
        assert_eq!(spec.argv(), ["zfs", "create", "-V", "10G", "tank/vol1"]);

        let err = build(ResourceMode::Volume, Action::Create, "", &name("tank/vol1")).unwrap_err();
        assert!(matches!(
            err,
            ZfsError::MissingInput {
                field: "volume size",
                ..
            }
        ));
    }

    #[test]
    fn empty_input_rejected() {
        for action in [Action::Create, Action::Rename, Action::Duplicate] {
            let err = build(ResourceMode::Dataset, action, "tank/a", &name("  ")).unwrap_err();
            assert!(matches!(err, ZfsError::MissingInput { .. }), "{action}");
            let err = build(ResourceMode::Dataset, action, "tank/a", &UserInput::None).unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn empty_target_rejected() {
        for action in [
            Action::Rename,
            Action::Promote,
            Action::Destroy,
            Action::GetProperties,
        ] {
            let err = build(ResourceMode::Dataset, action, "", &name("x")).unwrap_err();
            assert!(matches!(err, ZfsError::NoTarget { .. }), "{action}");
        }
        let err = build(ResourceMode::Snapshot, Action::Rollback, " ", &UserInput::None)
            .unwrap_err();
        assert!(matches!(err, ZfsError::NoTarget { .. }));
        let err = build(ResourceMode::Snapshot, Action::Duplicate, "", &name("tank/c")).unwrap_err();
        assert!(matches!(err, ZfsError::NoTarget { .. }));
    }

    #[test]
    fn every_selection_action_needs_a_target() {
        for mode in ResourceMode::variants() {
            for cap in capabilities(*mode) {
                let expected = !matches!(cap.action, Action::Create | Action::List);
                assert_eq!(cap.requires_target, expected, "{mode} {}", cap.action);
                if !expected {
                    continue;
                }
                let input = UserInput::Volume {
                    name: "tank/other@snap".into(),
                    size: "1G".into(),
                };
                for target in ["", "   "] {
                    let err = build(*mode, cap.action, target, &input).unwrap_err();
                    assert!(
                        matches!(err, ZfsError::NoTarget { .. }),
                        "{mode} {}: {err}",
                        cap.action
                    );
                }
            }
        }
    }

    #[test]
    fn snapshot_without_selection_rejected() {
        for mode in [ResourceMode::Dataset, ResourceMode::Volume] {
            let cap = capability(mode, Action::Duplicate).unwrap();
            assert!(cap.needs_target());
            assert!(!cap.template.contains(&Token::Target));
            let err = build(mode, Action::Duplicate, "", &name("tank/other@snap")).unwrap_err();
            assert!(matches!(err, ZfsError::NoTarget { .. }));
            assert_eq!(
                build(mode, Action::Duplicate, "tank/other", &name("tank/other@snap"))
                    .unwrap()
                    .argv(),
                ["zfs", "snapshot", "tank/other@snap"]
            );
        }
    }

    #[test]
    fn mutating_argv_shapes() {
        let cases = [
            (
                ResourceMode::Pool,
                Action::Rename,
                "tank",
                name("tank2"),
                vec!["zpool", "rename", "tank", "tank2"],
            ),
            (
                ResourceMode::Snapshot,
                Action::Duplicate,
                "tank/a@s1",
                name("tank/a-clone"),
                vec!["zfs", "clone", "tank/a@s1", "tank/a-clone"],
            ),
            (
                ResourceMode::Volume,
                Action::Duplicate,
                "tank/vol",
                name("tank/vol@today"),
                vec!["zfs", "snapshot", "tank/vol@today"],
            ),
            (
                ResourceMode::Pool,
                Action::Destroy,
                "tank",
                UserInput::None,
                vec!["zpool", "destroy", "tank"],
            ),
            (
                ResourceMode::Snapshot,
                Action::Rollback,
                "tank/a@s1",
                UserInput::None,
                vec!["zfs", "rollback", "tank/a@s1"],
            ),
            (
                ResourceMode::Pool,
                Action::GetProperties,
                "tank",
                UserInput::None,
                vec!["zpool", "get", "all", "tank"],
            ),
        ];
        for (mode, action, target, input, expected) in cases {
            let spec = build(mode, action, target, &input).unwrap();
            assert_eq!(spec.argv(), expected.as_slice(), "{mode} {action}");
        }
    }

    #[test]
    fn names_with_spaces_stay_one_token() {
        let spec = build(
            ResourceMode::Dataset,
            Action::Rename,
            "tank/my data",
            &name("tank/your data; rm -rf /"),
        )
        .unwrap();
        assert_eq!(spec.args().len(), 3);
        assert_eq!(spec.args()[2], "tank/your data; rm -rf /");
        assert_eq!(
            spec.to_string(),
            "zfs rename 'tank/my data' 'tank/your data; rm -rf /'"
        );
    }

    #[test]
    fn suggested_defaults() {
        use Action as A;
        use ResourceMode as M;
        assert_eq!(
            suggested_input(M::Dataset, A::Create, "tank/data").as_deref(),
            Some("tank/data/")
        );
        assert_eq!(suggested_input(M::Dataset, A::Create, ""), None);
        assert_eq!(suggested_input(M::Volume, A::Create, "tank/vol"), None);
        assert_eq!(
            suggested_input(M::Dataset, A::Duplicate, "tank/data").as_deref(),
            Some("tank/data@")
        );
        assert_eq!(
            suggested_input(M::Volume, A::Duplicate, "tank/vol").as_deref(),
            Some("tank/vol@")
        );
        assert_eq!(
            suggested_input(M::Snapshot, A::Duplicate, "tank/a@s1").as_deref(),
            Some("tank/a@s1")
        );
        assert_eq!(
            suggested_input(M::Pool, A::Rename, "tank").as_deref(),
            Some("tank")
        );
        assert_eq!(suggested_input(M::Dataset, A::Destroy, "tank/data"), None);
        assert_eq!(suggested_input(M::Pool, A::Duplicate, "tank"), None);
    }

    #[test]
    fn usage_strings() {
        let cap = capability(ResourceMode::Volume, Action::Create).unwrap();
        assert_eq!(cap.usage(), "zfs create -V <size> <input>");
        assert!(cap.needs_size());
        assert!(!cap.needs_target());
    }
}
