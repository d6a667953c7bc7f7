//! Integration tests for child reconciliation against the headless factory.
//! Each test asserts on the exact platform mutations a rebuild produced.
use std::cell::RefCell;
use std::rc::Rc;
use trellis_ui::node::RenderCommand;
use trellis_ui::{
    Behavior, ElementWidget, MemoryFactory, Mount, NodeId, Record, Widget, WidgetError,
};

fn mount(widget: &Widget) -> Mount<MemoryFactory> {
    let mut factory = MemoryFactory::new();
    let container = factory.create_container("body");
    let mut mount = Mount::new(factory, container, widget);
    mount.factory_mut().clear_commands();
    mount
}

fn keyed_list(keys: &[&str]) -> Widget {
    ElementWidget::builder("ul")
        .children(keys.iter().map(|k| {
            ElementWidget::builder("li")
                .key(*k)
                .child(*k)
                .build()
                .unwrap()
        }))
        .build()
        .unwrap()
}

fn text_list(items: &[&str]) -> Widget {
    ElementWidget::builder("ul")
        .children(items.iter().map(|i| Widget::text(*i)))
        .build()
        .unwrap()
}

fn markup(mount: &Mount<MemoryFactory>) -> String {
    mount.factory().to_markup(mount.root_node())
}

fn child_ids(mount: &Mount<MemoryFactory>) -> Vec<NodeId> {
    mount.factory().children(mount.root_node()).to_vec()
}

#[test]
fn test_rebuild_with_equal_tree_is_silent() {
    let build = || {
        ElementWidget::builder("section")
            .scope("app")
            .attr("id", "main")
            .style("display", "flex")
            .child(
                ElementWidget::builder("h1")
                    .child("Title")
                    .build()
                    .unwrap(),
            )
            .child(keyed_list(&["a", "b"]))
            .child(
                ElementWidget::builder("footer")
                    .raw_content("<b>x</b>")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    };
    let mut m = mount(&build());

    assert!(m.rebuild(&build(), false));
    assert!(m.factory_mut().take_commands().is_empty());
}

#[test]
fn test_keyed_rotation_moves_once() {
    let mut m = mount(&keyed_list(&["a", "b", "c"]));
    let before = child_ids(&m);

    m.rebuild(&keyed_list(&["c", "a", "b"]), false);

    let commands = m.factory_mut().take_commands();
    assert_eq!(
        commands,
        vec![RenderCommand::InsertBefore {
            parent: m.root_node(),
            child: before[2],
            reference: before[0],
        }]
    );
    assert_eq!(child_ids(&m), vec![before[2], before[0], before[1]]);
    assert_eq!(markup(&m), "<ul><li>c</li><li>a</li><li>b</li></ul>");
}

#[test]
fn test_keyed_reverse_keeps_every_node() {
    let mut m = mount(&keyed_list(&["a", "b", "c", "d"]));
    let mut before = child_ids(&m);

    m.rebuild(&keyed_list(&["d", "c", "b", "a"]), false);

    let commands = m.factory_mut().take_commands();
    assert!(commands
        .iter()
        .all(|c| matches!(c, RenderCommand::InsertBefore { .. })));
    before.reverse();
    assert_eq!(child_ids(&m), before);
}

#[test]
fn test_keyed_removal_and_insertion() {
    let mut m = mount(&keyed_list(&["a", "b", "c"]));
    let before = child_ids(&m);

    m.rebuild(&keyed_list(&["a", "x", "c"]), false);

    let after = child_ids(&m);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert!(!before.contains(&after[1]));
    assert!(m.factory().node(before[1]).is_none());
    assert_eq!(markup(&m), "<ul><li>a</li><li>x</li><li>c</li></ul>");
}

#[test]
fn test_unkeyed_append_creates_one_node() {
    let mut m = mount(&text_list(&["a", "b"]));

    m.rebuild(&text_list(&["a", "b", "c"]), false);

    let commands = m.factory_mut().take_commands();
    let creates = commands.iter().filter(|c| c.is_create()).count();
    assert_eq!(creates, 1);
    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[1], RenderCommand::AppendChild { .. }));
}

#[test]
fn test_unkeyed_truncate_removes_from_end() {
    let mut m = mount(&text_list(&["a", "b", "c"]));
    let before = child_ids(&m);

    m.rebuild(&text_list(&["a"]), false);

    assert_eq!(
        m.factory_mut().take_commands(),
        vec![
            RenderCommand::Remove { node: before[2] },
            RenderCommand::Remove { node: before[1] },
        ]
    );
}

#[test]
fn test_unkeyed_match_by_ordinal_updates_in_place() {
    let mut m = mount(&text_list(&["a", "b"]));
    let before = child_ids(&m);

    m.rebuild(&text_list(&["a", "z"]), false);

    assert_eq!(
        m.factory_mut().take_commands(),
        vec![RenderCommand::SetText {
            node: before[1],
            value: "z".to_string()
        }]
    );
}

#[test]
fn test_mixed_keyed_and_unkeyed_siblings() {
    let list = |head: &str| {
        ElementWidget::builder("div")
            .child(Widget::text(head))
            .child(Widget::text("pinned").with_key("pin"))
            .child(Widget::text("tail"))
            .build()
            .unwrap()
    };
    let mut m = mount(&list("one"));
    let before = child_ids(&m);

    // Dropping the first unkeyed child shifts the ordinals of the rest
    let next = ElementWidget::builder("div")
        .child(Widget::text("pinned").with_key("pin"))
        .child(Widget::text("tail"))
        .build()
        .unwrap();
    m.rebuild(&next, false);

    let after = child_ids(&m);
    assert_eq!(after[0], before[1]);
    assert_eq!(after[1], before[0]);
    assert_eq!(markup(&m), "<div>pinnedtail</div>");
}

#[test]
fn test_attribute_remove_and_add_are_single_commands() {
    let mut m = mount(
        &ElementWidget::builder("button")
            .attr("disabled", "")
            .build()
            .unwrap(),
    );
    let node = m.root_node();

    m.rebuild(&ElementWidget::builder("button").build().unwrap(), false);
    assert_eq!(
        m.factory_mut().take_commands(),
        vec![RenderCommand::RemoveAttribute {
            node,
            name: "disabled".into()
        }]
    );

    m.rebuild(
        &ElementWidget::builder("button")
            .attr("class", "x")
            .build()
            .unwrap(),
        false,
    );
    assert_eq!(
        m.factory_mut().take_commands(),
        vec![RenderCommand::SetAttribute {
            node,
            name: "class".into(),
            value: "x".to_string()
        }]
    );
}

#[test]
fn test_checked_is_reapplied_while_attribute_is_not() {
    let checkbox = || {
        ElementWidget::builder("input")
            .attr("type", "checkbox")
            .attr("checked", "")
            .build()
            .unwrap()
    };
    let mut m = mount(&checkbox());
    let node = m.root_node();
    m.factory_mut().node_mut(node).unwrap().checked = false;

    m.rebuild(&checkbox(), false);

    assert_eq!(
        m.factory_mut().take_commands(),
        vec![RenderCommand::SetChecked {
            node,
            checked: true
        }]
    );
}

#[test]
fn test_value_follows_the_widget_after_typing() {
    let input = |value: &str| {
        ElementWidget::builder("input")
            .attr("value", value)
            .build()
            .unwrap()
    };
    let mut m = mount(&input("abc"));
    let node = m.root_node();
    m.factory_mut().node_mut(node).unwrap().value = Some("abcd".to_string());

    m.rebuild(&input("abc"), false);

    assert_eq!(
        m.factory().node(node).unwrap().value.as_deref(),
        Some("abc")
    );
}

#[test]
fn test_tag_change_replaces_node() {
    let mut m = mount(
        &ElementWidget::builder("div")
            .child(
                ElementWidget::builder("div")
                    .child("x")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap(),
    );
    let old = child_ids(&m)[0];

    m.rebuild(
        &ElementWidget::builder("div")
            .child(
                ElementWidget::builder("span")
                    .child("x")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap(),
        false,
    );

    let commands = m.factory_mut().take_commands();
    let removed = commands
        .iter()
        .position(|c| *c == RenderCommand::Remove { node: old })
        .unwrap();
    let created = commands.iter().position(|c| match c {
        RenderCommand::CreateNode { tag, .. } => tag == "span",
        _ => false,
    });
    // Destroy first, then create
    assert!(removed < created.unwrap());
    assert_eq!(markup(&m), "<div><span>x</span></div>");
}

#[test]
fn test_element_to_text_replaces_node() {
    let mut m = mount(
        &ElementWidget::builder("p")
            .child(ElementWidget::builder("b").build().unwrap())
            .build()
            .unwrap(),
    );
    let old = child_ids(&m)[0];

    m.rebuild(
        &ElementWidget::builder("p").child("plain").build().unwrap(),
        false,
    );

    let commands = m.factory_mut().take_commands();
    assert_eq!(commands[0], RenderCommand::Remove { node: old });
    assert!(matches!(
        &commands[1],
        RenderCommand::CreateText { value, .. } if value == "plain"
    ));
    assert_eq!(markup(&m), "<p>plain</p>");
}

#[test]
fn test_root_replacement() {
    let mut m = mount(&ElementWidget::builder("div").build().unwrap());
    let old = m.root_node();

    let main = ElementWidget::builder("main").build().unwrap();
    assert!(!m.rebuild(&main, false));

    let commands = m.factory_mut().take_commands();
    assert_eq!(commands[0], RenderCommand::Remove { node: old });
    assert!(matches!(
        &commands[1],
        RenderCommand::CreateNode { tag, .. } if tag == "main"
    ));
    assert_eq!(m.factory().children(m.container()), &[m.root_node()]);
    assert_eq!(
        m.factory().to_markup(m.container()),
        "<body><main></main></body>"
    );
}

#[test]
fn test_replacement_keeps_position_among_siblings() {
    let list = |middle: Widget| {
        ElementWidget::builder("ul")
            .child(Widget::text("first"))
            .child(middle)
            .child(Widget::text("last"))
            .build()
            .unwrap()
    };
    let bold = ElementWidget::builder("b").child("x").build().unwrap();
    let mut m = mount(&list(bold));
    let before = child_ids(&m);

    m.rebuild(&list(Widget::text("middle")), false);

    let after = child_ids(&m);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(markup(&m), "<ul>firstmiddlelast</ul>");
}

fn hooked(name: &str, log: &Rc<RefCell<Vec<String>>>) -> Rc<Record> {
    let (on_mount, on_unmount) = (log.clone(), log.clone());
    let label = name.to_string();
    let behavior = Behavior::new(name)
        .with_render(move |_| {
            ElementWidget::builder("li")
                .child(label.as_str())
                .build()
                .unwrap()
        })
        .with_on_mount(move |r| {
            on_mount
                .borrow_mut()
                .push(format!("mount {}", r.class_name()))
        })
        .with_on_unmount(move |r| {
            on_unmount
                .borrow_mut()
                .push(format!("unmount {}", r.class_name()))
        });
    Record::new(Rc::new(behavior))
}

#[test]
fn test_keyed_components_run_hooks_on_insert_remove_and_replace() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let a = hooked("A", &log);
    let b = hooked("B", &log);
    let c = hooked("C", &log);
    let x = hooked("X", &log);

    let keyed = |key: &str, record: &Rc<Record>| Widget::component(record.clone()).with_key(key);
    let mut m = mount(
        &ElementWidget::builder("ul")
            .child(keyed("a", &a))
            .child(keyed("b", &b))
            .child(keyed("c", &c))
            .build()
            .unwrap(),
    );
    assert_eq!(*log.borrow(), vec!["mount A", "mount B", "mount C"]);
    log.borrow_mut().clear();

    // "x" is new, "b" is gone and "c" turns from a component into an element
    m.rebuild(
        &ElementWidget::builder("ul")
            .child(keyed("a", &a))
            .child(keyed("x", &x))
            .child(
                ElementWidget::builder("li")
                    .key("c")
                    .child("C")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap(),
        false,
    );

    assert_eq!(*log.borrow(), vec!["mount X", "unmount C", "unmount B"]);
    assert_eq!(markup(&m), "<ul><li>A</li><li>X</li><li>C</li></ul>");
}

#[test]
fn test_children_and_raw_content_are_rejected() {
    let result = ElementWidget::builder("div")
        .child("a")
        .raw_content("<i>b</i>")
        .build();
    assert!(matches!(
        result,
        Err(WidgetError::ChildrenAndRawContent { .. })
    ));
}
