//! Parse/write round trips over realistic descriptors

use kpom_tree::{parse, write, Element};

const FULL_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!--
  Licensed under the Apache License, Version 2.0
-->
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
  <modelVersion>4.0.0</modelVersion>

  <parent>
    <groupId>org.acme</groupId>
    <artifactId>acme-parent</artifactId>
    <version>3</version>
  </parent>

  <artifactId>demo</artifactId>
  <name>Demo &amp; Friends</name>

  <properties>
    <!-- pinned by the release team -->
    <acme.version>1.0</acme.version>
    <empty.property/>
  </properties>

  <build>
    <plugins>
      <plugin>
        <artifactId>maven-compiler-plugin</artifactId>
        <configuration>
          <compilerArgs><arg>-Xlint:all</arg></compilerArgs>
          <script><![CDATA[if (a < b) { run(); }]]></script>
        </configuration>
      </plugin>
    </plugins>
  </build>
</project>
"#;

#[test]
fn test_full_pom_round_trips_byte_for_byte() {
    let result = parse(FULL_POM);
    assert!(result.is_ok(), "parse failed: {:?}", result.err());
    let Ok(tree) = result else { return };
    assert_eq!(write(&tree), FULL_POM);
}

#[test]
fn test_namespaces_survive_round_trip() {
    let Ok(tree) = parse(FULL_POM) else {
        panic!("fixture must parse");
    };
    assert_eq!(
        tree.root.attribute("xmlns").as_deref(),
        Some("http://maven.apache.org/POM/4.0.0")
    );
    assert!(tree.root.attribute("xsi:schemaLocation").is_some());
    assert_eq!(tree.declared_encoding().as_deref(), Some("UTF-8"));
}

#[test]
fn test_edit_leaves_siblings_untouched() {
    let Ok(mut tree) = parse(FULL_POM) else {
        panic!("fixture must parse");
    };
    if let Some(name) = tree.root.child_mut("name") {
        name.set_text("Renamed <demo>");
    }
    let written = write(&tree);

    assert!(written.contains("<name>Renamed &lt;demo&gt;</name>"));
    let properties_block = "  <properties>\n    <!-- pinned by the release team -->\n    <acme.version>1.0</acme.version>\n    <empty.property/>\n  </properties>\n";
    assert!(written.contains(properties_block));
    assert!(written.contains("<compilerArgs><arg>-Xlint:all</arg></compilerArgs>"));
}

#[test]
fn test_inserted_element_follows_document_indentation() {
    let Ok(mut tree) = parse(FULL_POM) else {
        panic!("fixture must parse");
    };
    let anchor = tree.root.position_of("artifactId");
    tree.root
        .insert_element_after(anchor, Element::with_text("version", "1.1"));
    let written = write(&tree);
    assert!(written.contains("  <artifactId>demo</artifactId>\n  <version>1.1</version>\n  <name>"));
}

#[test]
fn test_reparse_of_written_tree_is_stable() {
    let Ok(mut tree) = parse(FULL_POM) else {
        panic!("fixture must parse");
    };
    let mut repositories = Element::new("repositories");
    let mut repository = Element::new("repository");
    repository.push_element(Element::with_text("id", "central"));
    repositories.push_element(repository);
    tree.root.push_element(repositories);

    let first = write(&tree);
    let Ok(reparsed) = parse(&first) else {
        panic!("written tree must parse");
    };
    assert_eq!(write(&reparsed), first);
}
