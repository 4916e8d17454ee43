use projtrack_core::{
    decode_projects, encode_projects, status_icon, LinkKind, Project, ProjectStatus,
    StatusDisplay,
};
use uuid::Uuid;

#[test]
fn project_new_sets_defaults() {
    let project = Project::new("Acme");

    assert!(!project.id.is_nil());
    assert_eq!(project.title, "Acme");
    assert_eq!(project.status, None);
    assert_eq!(project.description, None);
    assert_eq!(project.links.iter().count(), 0);
    assert_eq!(project.favorite, None);
}

#[test]
fn project_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut project = Project::with_id(id, "Acme")
        .with_status("In Review")
        .with_link(LinkKind::Website, "acme.dev")
        .with_link(LinkKind::Repository, "github.com/acme/web");
    project.description = Some("# Notes".to_string());
    project.favorite = Some(LinkKind::Repository);

    let json = serde_json::to_value(&project).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["title"], "Acme");
    assert_eq!(json["status"], "In Review");
    assert_eq!(json["description"], "# Notes");
    assert_eq!(json["website"], "acme.dev");
    assert_eq!(json["repository"], "github.com/acme/web");
    assert_eq!(json["favorite"], "repository");
    assert!(json.get("roadmap").is_none());

    let decoded: Project = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, project);
}

#[test]
fn decode_then_encode_preserves_well_formed_sequences() {
    let projects = vec![
        Project::new("A").with_status("Backlog"),
        Project::new("B")
            .with_status("Someday")
            .with_link(LinkKind::Backend, "admin.b.dev"),
        Project::new("").with_link(LinkKind::Extra, "store-handle"),
    ];

    let blob = encode_projects(&projects).unwrap();
    let decoded = decode_projects(&blob).unwrap();
    assert_eq!(decoded, projects);
    assert_eq!(encode_projects(&decoded).unwrap(), blob);
}

#[test]
fn canonical_field_fills_the_slot_and_legacy_values_survive() {
    let decoded = decode_projects(
        r#"[{"title":"A","repository":"canonical","repo":"legacy","github":"older"}]"#,
    )
    .unwrap();
    assert_eq!(decoded[0].link(LinkKind::Repository), Some("canonical"));
    assert_eq!(decoded[0].legacy_links["repo"], "legacy");
    assert_eq!(decoded[0].legacy_links["github"], "older");

    let reencoded = encode_projects(&decoded).unwrap();
    assert_eq!(decode_projects(&reencoded).unwrap(), decoded);
}

#[test]
fn legacy_url_is_the_backend_admin_handle() {
    let decoded = decode_projects(r#"[{"title":"Shop","url":"shop-one"}]"#).unwrap();
    assert_eq!(decoded[0].link(LinkKind::Backend), Some("shop-one"));
    assert!(decoded[0].legacy_links.is_empty());
}

#[test]
fn unknown_favorite_and_fields_are_ignored() {
    let decoded =
        decode_projects(r#"[{"title":"A","favorite":"figma","color":"teal"}]"#).unwrap();
    assert_eq!(decoded[0].favorite, None);
}

#[test]
fn status_icon_is_total() {
    for label in ["", " ", "Nonexistent", "completed", "In  Progress", "🚧"] {
        assert_eq!(status_icon(label), StatusDisplay::DEFAULT, "label {label:?}");
    }
    for status in ProjectStatus::ALL {
        assert!(status_icon(status.label()).color.is_some());
    }
}

#[test]
fn unrecognized_status_survives_and_has_no_kind() {
    let project = Project::new("A").with_status("Someday");
    assert_eq!(project.status_kind(), None);
    assert_eq!(
        Project::new("B").with_status("Paused").status_kind(),
        Some(ProjectStatus::Paused)
    );
}
