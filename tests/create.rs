use vnode_reconciler::{
	h,
	memory::{MemoryHost, Mutation, NodeId},
	text, Descriptor, Error, Props, Renderer, VNode,
};

type Node = VNode<MemoryHost>;

fn renderer() -> (Renderer<MemoryHost>, NodeId) {
	let mut host = MemoryHost::new();
	let root = host.create_root("body");
	(Renderer::new(host), root)
}

#[test]
fn element_with_text() {
	let (mut renderer, root) = renderer();
	let vnode: Node = h("p", Props::new().with("id", "greeting").class("big"), "Hello vnode-reconciler!").unwrap();
	renderer.render(Some(vnode), &root).unwrap();

	assert_eq!(renderer.host().inner_html(root), r#"<p id="greeting" class="big">Hello vnode-reconciler!</p>"#);
	let p = renderer.host().children(root)[0];
	assert_eq!(renderer.tree(&root).unwrap().host(), Some(&p));
	assert_eq!(renderer.host().find("#greeting"), Some(p));
}

#[test]
fn text_root() {
	let (mut renderer, root) = renderer();
	renderer.render(Some(text("plain")), &root).unwrap();
	assert_eq!(renderer.host().inner_html(root), "plain");
	assert!(matches!(renderer.host().mutations(), [Mutation::CreateText { .. }, Mutation::Insert { moved: false, .. }]));
}

#[test]
fn nested_list() {
	let (mut renderer, root) = renderer();
	let items: Vec<Node> = ["a", "b", "c"].iter().map(|&key| h("li", Props::new(), key).unwrap().with_key(key)).collect();
	renderer.render(Some(h("ul", Props::new(), items).unwrap()), &root).unwrap();
	assert_eq!(renderer.host().inner_html(root), "<ul><li>a</li><li>b</li><li>c</li></ul>");
}

#[test]
fn fragment_children_land_in_parent() {
	let (mut renderer, root) = renderer();
	let fragment: Node = h(Descriptor::Fragment, Props::new(), vec![text("one"), text("two")]).unwrap();
	renderer.render(Some(h("div", Props::new(), fragment).unwrap()), &root).unwrap();
	assert_eq!(renderer.host().inner_html(root), "<div>onetwo</div>");

	let div = renderer.host().children(root)[0];
	let fragment = renderer.tree(&root).unwrap().children().as_slice()[0].host().copied();
	assert_eq!(fragment, Some(renderer.host().children(div)[0]));
}

#[test]
fn empty_fragment_leaves_placeholder() {
	let (mut renderer, root) = renderer();
	let empty: Node = h(Descriptor::Fragment, Props::new(), ()).unwrap();
	renderer.render(Some(empty), &root).unwrap();
	assert_eq!(renderer.host().children(root).len(), 1);
	assert_eq!(renderer.host().inner_html(root), "");
}

#[test]
fn svg_namespace_is_inherited() {
	let (mut renderer, root) = renderer();
	let circle: Node = h("circle", Props::new().with("r", "4"), ()).unwrap();
	let svg: Node = h("svg", Props::new(), h("g", Props::new(), circle).unwrap()).unwrap();
	let div: Node = h("div", Props::new(), svg).unwrap();
	renderer.render(Some(div), &root).unwrap();

	let host = renderer.host();
	let div = host.children(root)[0];
	let svg = host.children(div)[0];
	let g = host.children(svg)[0];
	let circle = host.children(g)[0];
	assert!(!host.is_svg(div));
	assert!(host.is_svg(svg));
	assert!(host.is_svg(g));
	assert!(host.is_svg(circle));
	assert_eq!(host.attribute(circle, "r"), Some("4"));
}

#[test]
fn portal_renders_into_target() {
	let mut host = MemoryHost::new();
	let root = host.create_root("body");
	let modal = host.create_root("aside");
	host.set_attribute_unrecorded(modal, "id", "modal");
	let mut renderer = Renderer::new(host);

	let portal: Node = h(Descriptor::portal("#modal"), Props::new(), h("p", Props::new(), "inside").unwrap()).unwrap();
	renderer.render(Some(h("main", Props::new(), portal).unwrap()), &root).unwrap();

	assert_eq!(renderer.host().inner_html(modal), "<p>inside</p>");
	assert_eq!(renderer.host().inner_html(root), "<main></main>");
	let main = renderer.host().children(root)[0];
	assert_eq!(renderer.host().children(main).len(), 1, "placeholder");
}

#[test]
fn portal_into_node() {
	let mut host = MemoryHost::new();
	let root = host.create_root("body");
	let target = host.create_root("div");
	let mut renderer = Renderer::new(host);

	renderer.render(Some(h(Descriptor::portal_into(target), Props::new(), "direct").unwrap()), &root).unwrap();
	assert_eq!(renderer.host().inner_html(target), "direct");
}

#[test]
fn missing_portal_target() {
	let (mut renderer, root) = renderer();
	let portal: Node = h(Descriptor::portal("#nowhere"), Props::new(), "lost").unwrap();
	assert_eq!(renderer.render(Some(portal), &root), Err(Error::MissingPortalTarget("#nowhere".to_owned())));
}

#[test]
fn listeners_and_properties() {
	use std::{cell::Cell, rc::Rc};
	use vnode_reconciler::Listener;

	let (mut renderer, root) = renderer();
	let clicks = Rc::new(Cell::new(0));
	let listener = Listener::new({
		let clicks = Rc::clone(&clicks);
		move |_| clicks.set(clicks.get() + 1)
	});
	let input: Node = h("input", Props::new().with("value", "typed").with("checked", true).on("Click", listener), ()).unwrap();
	renderer.render(Some(input), &root).unwrap();

	let host = renderer.host();
	let input = host.children(root)[0];
	assert_eq!(host.property(input, "value").and_then(|value| value.as_str()), Some("typed"));
	assert_eq!(host.property(input, "checked").and_then(|value| value.as_bool()), Some(true));
	assert_eq!(host.attribute(input, "value"), None);
	assert_eq!(host.listener_count(input, "click"), 1);

	host.dispatch(input, "click", &());
	host.dispatch(input, "click", &());
	assert_eq!(clicks.get(), 2);
}

#[test]
fn style_and_class() {
	let (mut renderer, root) = renderer();
	let div: Node = h("div", Props::new().class("a b").style([("color", "red"), ("margin", "0")]), ()).unwrap();
	renderer.render(Some(div), &root).unwrap();
	assert_eq!(renderer.host().inner_html(root), r#"<div class="a b" style="color: red;margin: 0;"></div>"#);
	assert_eq!(renderer.host().find(".b"), Some(renderer.host().children(root)[0]));
}

#[test]
fn render_none_unmounts() {
	let (mut renderer, root) = renderer();
	renderer.render(Some(h("div", Props::new(), "gone soon").unwrap()), &root).unwrap();
	renderer.render(None, &root).unwrap();
	assert!(renderer.host().children(root).is_empty());
	assert!(renderer.tree(&root).is_none());

	renderer.host_mut().take_mutations();
	renderer.render(None, &root).unwrap();
	assert!(renderer.host().mutations().is_empty());
}

#[test]
fn separate_containers() {
	let mut host = MemoryHost::new();
	let left = host.create_root("div");
	let right = host.create_root("div");
	let mut renderer = Renderer::new(host);

	renderer.render(Some(text("left")), &left).unwrap();
	renderer.render(Some(text("right")), &right).unwrap();
	renderer.render(Some(text("left again")), &left).unwrap();

	let host = renderer.into_host();
	assert_eq!(host.inner_html(left), "left again");
	assert_eq!(host.inner_html(right), "right");
}
