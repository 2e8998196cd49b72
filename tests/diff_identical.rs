use vnode_reconciler::{
	h,
	memory::{MemoryHost, Mutation, NodeId},
	text, Descriptor, Listener, Props, Renderer, VNode,
};

type Node = VNode<MemoryHost>;

fn renderer() -> (Renderer<MemoryHost>, NodeId) {
	let mut host = MemoryHost::new();
	let root = host.create_root("body");
	(Renderer::new(host), root)
}

fn page(listener: &Listener) -> Node {
	let items: Vec<Node> = (0..3).map(|i| h("li", Props::new().with("data-index", i), i).unwrap().with_key(i as usize)).collect();
	h(
		"div",
		Props::new().with("id", "page").class("wide").style([("color", "blue")]).on("click", listener.clone()),
		vec![
			h("ul", Props::new(), items).unwrap(),
			h(Descriptor::Fragment, Props::new(), ()).unwrap(),
			h("input", Props::new().with("value", "v"), ()).unwrap(),
			text("tail"),
		],
	)
	.unwrap()
}

/// Rendering the same tree twice must not touch the host.
#[test]
fn identical_rerender_is_silent() {
	let (mut renderer, root) = renderer();
	let listener = Listener::new(|_| ());
	renderer.render(Some(page(&listener)), &root).unwrap();
	let html = renderer.host().inner_html(root);

	renderer.host_mut().take_mutations();
	renderer.render(Some(page(&listener)), &root).unwrap();
	assert!(renderer.host().mutations().is_empty(), "{:?}", renderer.host().mutations());
	assert_eq!(renderer.host().inner_html(root), html);

	let div = renderer.host().children(root)[0];
	assert_eq!(renderer.host().listener_count(div, "click"), 1);
}

#[test]
fn create_diff_remove() {
	let (mut renderer, root) = renderer();
	let listener = Listener::new(|_| ());
	renderer.render(Some(page(&listener)), &root).unwrap();
	renderer.render(Some(page(&listener)), &root).unwrap();
	renderer.render(None, &root).unwrap();
	assert!(renderer.host().children(root).is_empty());
}

#[test]
fn text_is_updated_in_place() {
	let (mut renderer, root) = renderer();
	renderer.render(Some(h("p", Props::new(), "before").unwrap()), &root).unwrap();
	let text_node = renderer.host().children(renderer.host().children(root)[0])[0];

	renderer.host_mut().take_mutations();
	renderer.render(Some(h("p", Props::new(), "after").unwrap()), &root).unwrap();
	assert_eq!(
		renderer.host().mutations(),
		&[Mutation::SetText {
			node: text_node,
			text: "after".to_owned()
		}]
	);
}

#[test]
fn kind_mismatch_replaces_in_position() {
	let (mut renderer, root) = renderer();
	let list = |middle: Node| -> Node { h(Descriptor::Fragment, Props::new(), vec![text("a"), middle.with_key("m"), text("c")]).unwrap() };

	renderer.render(Some(list(text("b"))), &root).unwrap();
	renderer.render(Some(list(h("b", Props::new(), "bold").unwrap())), &root).unwrap();
	assert_eq!(renderer.host().inner_html(root), "a<b>bold</b>c");

	renderer.render(Some(list(text("plain"))), &root).unwrap();
	assert_eq!(renderer.host().inner_html(root), "aplainc");
}

#[test]
fn tag_mismatch_replaces() {
	let (mut renderer, root) = renderer();
	renderer.render(Some(h("p", Props::new(), "x").unwrap()), &root).unwrap();
	let p = renderer.host().children(root)[0];

	renderer.render(Some(h("section", Props::new(), "x").unwrap()), &root).unwrap();
	let section = renderer.host().children(root)[0];
	assert_ne!(p, section);
	assert_eq!(renderer.host().parent(p), None);
	assert_eq!(renderer.host().inner_html(root), "<section>x</section>");
}

#[test]
fn attributes_are_diffed() {
	let (mut renderer, root) = renderer();
	renderer.render(Some(h("a", Props::new().with("href", "/one").with("title", "t"), ()).unwrap()), &root).unwrap();
	let a = renderer.host().children(root)[0];

	renderer.host_mut().take_mutations();
	renderer.render(Some(h("a", Props::new().with("href", "/two").with("rel", "next"), ()).unwrap()), &root).unwrap();
	assert_eq!(
		renderer.host().mutations(),
		&[
			Mutation::SetAttribute {
				node: a,
				name: "href".to_owned(),
				value: "/two".to_owned()
			},
			Mutation::SetAttribute {
				node: a,
				name: "rel".to_owned(),
				value: "next".to_owned()
			},
			Mutation::RemoveAttribute { node: a, name: "title".to_owned() },
		]
	);
}

#[test]
fn style_class_and_properties() {
	let (mut renderer, root) = renderer();
	renderer
		.render(Some(h("input", Props::new().class("x").style([("color", "red")]).with("value", "1"), ()).unwrap()), &root)
		.unwrap();
	let input = renderer.host().children(root)[0];

	renderer.render(Some(h("input", Props::new().style([("color", "green")]).with("value", "2"), ()).unwrap()), &root).unwrap();
	let host = renderer.host();
	assert_eq!(host.class(input), None);
	assert_eq!(host.style(input), &[("color".to_owned(), "green".to_owned())]);
	assert_eq!(host.property(input, "value").and_then(|value| value.as_str()), Some("2"));

	renderer.render(Some(h("input", Props::new(), ()).unwrap()), &root).unwrap();
	let host = renderer.host();
	assert!(host.style(input).is_empty());
	assert_eq!(host.property(input, "value"), None);
}

#[test]
fn listeners_are_swapped() {
	let (mut renderer, root) = renderer();
	let first = Listener::new(|_| ());
	let second = Listener::new(|_| ());

	renderer.render(Some(h("button", Props::new().on("click", first.clone()), ()).unwrap()), &root).unwrap();
	let button = renderer.host().children(root)[0];

	renderer.host_mut().take_mutations();
	renderer.render(Some(h("button", Props::new().on("click", first), ()).unwrap()), &root).unwrap();
	assert!(renderer.host().mutations().is_empty(), "{:?}", renderer.host().mutations());

	renderer.render(Some(h("button", Props::new().on("click", second), ()).unwrap()), &root).unwrap();
	assert_eq!(
		renderer.host().mutations(),
		&[
			Mutation::RemoveListener {
				node: button,
				event: "click".to_owned()
			},
			Mutation::AddListener {
				node: button,
				event: "click".to_owned()
			},
		]
	);
	assert_eq!(renderer.host().listener_count(button, "click"), 1);

	renderer.render(Some(h("button", Props::new(), ()).unwrap()), &root).unwrap();
	assert_eq!(renderer.host().listener_count(button, "click"), 0);
}

#[test]
fn externally_changed_text_is_overwritten() {
	use vnode_reconciler::Host;

	let (mut renderer, root) = renderer();
	renderer.render(Some(text("ours")), &root).unwrap();
	let node = renderer.host().children(root)[0];
	renderer.host_mut().set_text(&node, "theirs");

	renderer.render(Some(text("ours")), &root).unwrap();
	assert_eq!(renderer.host().inner_html(root), "ours");
}

#[test]
fn class_updated_and_listener_dropped() {
	let (mut renderer, root) = renderer();
	let f = Listener::new(|_| ());
	renderer.render(Some(h("div", Props::new().with("class", "a").with("onClick", f), ()).unwrap()), &root).unwrap();
	let div = renderer.host().children(root)[0];
	assert_eq!(renderer.host().listener_count(div, "click"), 1);

	renderer.render(Some(h("div", Props::new().with("class", "b"), ()).unwrap()), &root).unwrap();
	let host = renderer.host();
	assert_eq!(host.class(div), Some("b"));
	assert_eq!(host.listener_count(div, "click"), 0);
	assert_eq!(host.attribute(div, "onClick"), None);
	assert_eq!(host.inner_html(root), r#"<div class="b"></div>"#);
}

#[test]
fn patched_in_children_keep_svg_context() {
	let (mut renderer, root) = renderer();
	let drawing = |shapes: Vec<Node>| -> Node { h("svg", Props::new(), h("g", Props::new(), shapes).unwrap()).unwrap() };
	renderer.render(Some(drawing(vec![])), &root).unwrap();

	let shapes = vec![h("circle", Props::new(), ()).unwrap().with_key("c"), h("rect", Props::new(), ()).unwrap().with_key("r")];
	renderer.render(Some(drawing(shapes)), &root).unwrap();
	let host = renderer.host();
	let g = host.children(host.children(root)[0])[0];
	assert_eq!(host.children(g).len(), 2);
	assert!(host.children(g).iter().all(|&shape| host.is_svg(shape)));
	assert_eq!(host.tag(host.children(g)[1]), Some("rect"));
}
