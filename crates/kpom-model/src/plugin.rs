//! Injection of the required build plugin into `build/plugins`

use crate::mapper::{insertion_anchor, PROJECT_ORDER};
use kpom_config::PluginSpec;
use kpom_tree::{DescriptorTree, Element};
use tracing::{debug, info};

const BUILD_ORDER: &[&str] = &[
    "sourceDirectory",
    "scriptSourceDirectory",
    "testSourceDirectory",
    "outputDirectory",
    "testOutputDirectory",
    "extensions",
    "defaultGoal",
    "resources",
    "testResources",
    "directory",
    "finalName",
    "filters",
    "pluginManagement",
    "plugins",
];

/// Read the coordinate tuple of a `<plugin>` element.
///
/// Blank values count as absent; `extensions` is set only by `true`.
pub fn read_plugin(plugin: &Element) -> PluginSpec {
    let text = |name: &str| plugin.child_text(name).filter(|v| !v.is_empty());
    PluginSpec {
        group_id: text("groupId").unwrap_or_default(),
        artifact_id: text("artifactId").unwrap_or_default(),
        version: text("version"),
        extensions: text("extensions").is_some_and(|v| v.eq_ignore_ascii_case("true")),
    }
}

/// Plugins declared directly under `build/plugins`, in order
pub fn declared_plugins(tree: &DescriptorTree) -> Vec<PluginSpec> {
    tree.root
        .child("build")
        .and_then(|build| build.child("plugins"))
        .map(|plugins| plugins.children_named("plugin").map(read_plugin).collect())
        .unwrap_or_default()
}

/// Exact tuple equality: group, artifact, version and extensions flag
pub fn same_plugin(declared: &PluginSpec, required: &PluginSpec) -> bool {
    let normalized = |spec: &PluginSpec| spec.version.as_deref().filter(|v| !v.is_empty()).map(str::to_owned);
    declared.group_id == required.group_id
        && declared.artifact_id == required.artifact_id
        && normalized(declared) == normalized(required)
        && declared.extensions == required.extensions
}

fn plugin_element(spec: &PluginSpec) -> Element {
    let mut plugin = Element::new("plugin");
    plugin.push_element(Element::with_text("groupId", &spec.group_id));
    plugin.push_element(Element::with_text("artifactId", &spec.artifact_id));
    if let Some(version) = spec.version.as_deref().filter(|v| !v.is_empty()) {
        plugin.push_element(Element::with_text("version", version));
    }
    if spec.extensions {
        plugin.push_element(Element::with_text("extensions", "true"));
    }
    plugin
}

/// Make sure `build/plugins` declares `spec`, creating the sections when
/// they are missing.
///
/// An entry that differs only in version does not count; the new entry is
/// appended next to it. Returns true when an entry was added.
pub fn ensure_plugin(tree: &mut DescriptorTree, spec: &PluginSpec) -> bool {
    let build = tree
        .root
        .child_or_insert("build", |project| insertion_anchor(project, "build", PROJECT_ORDER));
    let plugins = build.child_or_insert("plugins", |b| insertion_anchor(b, "plugins", BUILD_ORDER));

    if plugins
        .children_named("plugin")
        .any(|plugin| same_plugin(&read_plugin(plugin), spec))
    {
        debug!("{} already declared", spec.coordinates());
        return false;
    }

    plugins.push_element(plugin_element(spec));
    info!("Added build plugin {}", spec.coordinates());
    true
}

#[cfg(test)]
mod tests {
    use crate::plugin::*;
    use kpom_tree::parse;

    fn spec(version: &str) -> PluginSpec {
        PluginSpec::kie(Some(version.to_string()))
    }

    fn tree(text: &str) -> DescriptorTree {
        match parse(text) {
            Ok(tree) => tree,
            Err(e) => panic!("test descriptor must parse: {e}"),
        }
    }

    #[test]
    fn test_creates_build_section() {
        let mut t = tree("<project><artifactId>a</artifactId><profiles/></project>");
        assert!(ensure_plugin(&mut t, &spec("1.0")));
        let names: Vec<&str> = t.root.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["artifactId", "build", "profiles"]);
        assert_eq!(declared_plugins(&t), vec![spec("1.0")]);
    }

    #[test]
    fn test_exact_match_is_left_alone() {
        let text = "<project><build><plugins><plugin>\
                    <groupId>org.kie</groupId><artifactId>kie-maven-plugin</artifactId>\
                    <version>1.0</version><extensions>true</extensions>\
                    </plugin></plugins></build></project>";
        let mut t = tree(text);
        assert!(!ensure_plugin(&mut t, &spec("1.0")));
        assert_eq!(t.write(), text);
    }

    #[test]
    fn test_version_bump_leaves_upgrade_trail() {
        let mut t = tree("<project><build><plugins/></build></project>");
        assert!(ensure_plugin(&mut t, &spec("1.0")));
        assert!(ensure_plugin(&mut t, &spec("2.0")));
        assert_eq!(declared_plugins(&t), vec![spec("1.0"), spec("2.0")]);
    }

    #[test]
    fn test_extensions_flag_is_part_of_the_tuple() {
        let mut t = tree(
            "<project><build><plugins><plugin><groupId>org.kie</groupId>\
             <artifactId>kie-maven-plugin</artifactId><version>1.0</version>\
             </plugin></plugins></build></project>",
        );
        assert!(ensure_plugin(&mut t, &spec("1.0")));
        assert_eq!(declared_plugins(&t).len(), 2);
    }

    #[test]
    fn test_unversioned_spec_matches_unversioned_entry() {
        let mut t = tree("<project/>");
        let unversioned = PluginSpec::kie(None);
        assert!(ensure_plugin(&mut t, &unversioned));
        assert!(!ensure_plugin(&mut t, &unversioned));
        assert!(!t.write().contains("<version>"));
    }

    #[test]
    fn test_plugin_management_is_not_scanned() {
        let mut t = tree(
            "<project><build><pluginManagement><plugins><plugin><groupId>org.kie</groupId>\
             <artifactId>kie-maven-plugin</artifactId><version>1.0</version>\
             <extensions>true</extensions></plugin></plugins></pluginManagement></build></project>",
        );
        assert!(ensure_plugin(&mut t, &spec("1.0")));
        let build = t.root.child("build");
        let names: Vec<&str> = build
            .map(|b| b.elements().map(|e| e.name.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(names, ["pluginManagement", "plugins"]);
    }

    #[test]
    fn test_other_plugins_are_kept() {
        let mut t = tree(
            "<project><build><plugins><plugin><artifactId>maven-compiler-plugin</artifactId>\
             <configuration><release>17</release></configuration></plugin></plugins></build></project>",
        );
        ensure_plugin(&mut t, &spec("1.0"));
        let written = t.write();
        assert!(written.contains(
            "<plugin><artifactId>maven-compiler-plugin</artifactId><configuration><release>17</release></configuration></plugin>"
        ));
        assert_eq!(declared_plugins(&t).len(), 2);
    }
}
