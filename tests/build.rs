use vnode_reconciler::{
	h,
	memory::{MemoryHost, NodeId},
	text, Builder, ChildArity, Descriptor, Error, Key, KeyPolicy, Props, Renderer, StatefulDef, VNode, VNodeKind,
};

type Node = VNode<MemoryHost>;

#[test]
fn classification() {
	let div: Node = h("div", Props::new(), ()).unwrap();
	assert_eq!(div.kind(), VNodeKind::HostElementHtml);
	assert_eq!(div.tag_name(), Some("div"));

	let svg: Node = h("svg", Props::new(), ()).unwrap();
	assert_eq!(svg.kind(), VNodeKind::HostElementSvg);

	let fragment: Node = h(Descriptor::Fragment, Props::new(), ()).unwrap();
	assert_eq!(fragment.kind(), VNodeKind::Fragment);

	let portal: Node = h(Descriptor::portal("#target"), Props::new(), ()).unwrap();
	assert_eq!(portal.kind(), VNodeKind::Portal);

	let words: Node = text("words");
	assert_eq!(words.kind(), VNodeKind::Text);
	assert_eq!(words.text_content(), Some("words"));
}

#[test]
fn child_arity() {
	let none: Node = h("p", Props::new(), ()).unwrap();
	assert_eq!(none.child_arity(), ChildArity::None);

	let empty_list: Node = h("p", Props::new(), Vec::new()).unwrap();
	assert_eq!(empty_list.child_arity(), ChildArity::None);

	let scalar: Node = h("p", Props::new(), 42_u32).unwrap();
	assert_eq!(scalar.child_arity(), ChildArity::Single);
	assert_eq!(scalar.children().as_slice()[0].text_content(), Some("42"));

	let single_list: Node = h("p", Props::new(), vec![text("only")]).unwrap();
	assert_eq!(single_list.child_arity(), ChildArity::Single);

	let keyed: Node = h("p", Props::new(), [text("a"), text("b").with_key("b"), text("c")]).unwrap();
	assert_eq!(keyed.child_arity(), ChildArity::Keyed);
	let keys: Vec<&str> = keyed.children().as_slice().iter().map(|child| child.key().unwrap().as_str()).collect();
	assert_eq!(keys, ["φ0", "b", "φ2"]);
}

#[test]
fn duplicate_keys() {
	let result: Result<Node, _> = h("ul", Props::new(), vec![text("a").with_key("k"), text("b").with_key("k")]);
	assert_eq!(result.unwrap_err(), Error::DuplicateKey(Key::from("k")));

	let clashing: Result<Node, _> = h("ul", Props::new(), vec![text("a"), text("b").with_key("φ0")]);
	assert_eq!(clashing.unwrap_err(), Error::DuplicateKey(Key::positional(0)));
}

#[test]
fn required_keys() {
	let builder = Builder::new().key_policy(KeyPolicy::Required);
	let missing: Result<Node, _> = builder.build("ul", Props::new(), vec![text("a").with_key("a"), text("b")]);
	assert_eq!(missing.unwrap_err(), Error::MissingKey { index: 1 });

	let keyed: Node = builder.build("ul", Props::new(), vec![text("a").with_key("a"), text("b").with_key("b")]).unwrap();
	assert_eq!(keyed.child_arity(), ChildArity::Keyed);
}

#[test]
fn invalid_descriptors() {
	for tag in ["", "1h", "a b", "<p>"] {
		let result: Result<Node, _> = h(tag, Props::new(), ());
		assert!(matches!(result, Err(Error::InvalidDescriptor(_))), "{:?}", tag);
	}
	let custom: Node = h("my-element", Props::new(), ()).unwrap();
	assert_eq!(custom.tag_name(), Some("my-element"));
}

#[test]
fn component_kinds() {
	#[derive(Default)]
	struct Empty;
	impl vnode_reconciler::Component<MemoryHost> for Empty {
		fn render(&self, _: &Props) -> vnode_reconciler::Result<Node> {
			h(Descriptor::Fragment, Props::new(), ())
		}
	}

	let stateful: Node = h(StatefulDef::of::<Empty>(), Props::new(), ()).unwrap();
	assert_eq!(stateful.kind(), VNodeKind::ComponentStateful);
	assert!(stateful.kind().is_component());

	let functional: Node = h(vnode_reconciler::FunctionalDef::new("empty", |_| Ok(text("nothing"))), Props::new(), ()).unwrap();
	assert_eq!(functional.kind(), VNodeKind::ComponentFunctional);

	let mut host = MemoryHost::new();
	let root: NodeId = host.create_root("body");
	let mut renderer = Renderer::new(host);
	renderer.render(Some(stateful), &root).unwrap();
	assert_eq!(renderer.host().children(root).len(), 1, "empty fragment placeholder");
}
