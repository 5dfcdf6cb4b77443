//! Descriptor behaviour over small in-memory projects

use std::rc::Rc;

use apidoc_core::phpdoc::{ConstExpr, TypeNode, TypeParser};
use apidoc_core::resolver::ResolveError;
use apidoc_core::structure::PropertyVisibility;
use apidoc_core::testutil::TestProject;
use apidoc_core::types::VarType;
use apidoc_core::DocContext;

fn structure_name(ty: &VarType) -> Option<&str> {
    match ty {
        VarType::Structure { name, .. } => Some(name),
        _ => None,
    }
}

fn resolve_in(ctx: &DocContext, class: &str, text: &str) -> Result<VarType, ResolveError> {
    let structure = ctx.structure(class).expect("structure");
    let node = TypeParser::parse_str(text).expect("type parses");
    structure.resolver(ctx).resolve_from_node(&node, None)
}

#[test]
fn test_one_descriptor_per_name() {
    let ctx = TestProject::new()
        .file("src/Box.php", "<?php namespace App; class Box {} class Shelf {}")
        .context();

    let first = resolve_in(&ctx, "App\\Shelf", "Box").unwrap();
    let second = resolve_in(&ctx, "App\\Shelf", "\\App\\Box").unwrap();
    assert_eq!(first, second);

    let id = first.structure_id().expect("structure reference");
    let by_id = ctx.structure_by_id(id).expect("registered");
    let by_name = ctx.structure("app\\box").expect("registered");
    assert!(Rc::ptr_eq(&by_id, &by_name));
}

#[test]
fn test_ordering_is_natural_and_stable() {
    let source = r"<?php
        namespace App;
        interface Step10 {}
        interface Step2 {}
        interface Step1 {}
        class Pipeline implements Step10, Step2, Step1 {
            public function run10() {}
            public function run9() {}
            public function Run1() {}
        }";
    let collect = || {
        let ctx = TestProject::new().file("src/Pipeline.php", source).context();
        let pipeline = ctx.structure("App\\Pipeline").expect("pipeline");
        let interfaces: Vec<String> = pipeline
            .interfaces(&ctx)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        let methods: Vec<String> = pipeline.methods(&ctx).unwrap().keys().cloned().collect();
        (interfaces, methods)
    };

    let (interfaces, methods) = collect();
    assert_eq!(interfaces, vec!["App\\Step1", "App\\Step2", "App\\Step10"]);
    assert_eq!(methods, vec!["Run1", "run9", "run10"]);
    assert_eq!(collect(), (interfaces, methods));
}

#[test]
fn test_implements_annotation_wins() {
    let ctx = TestProject::new()
        .file(
            "src/Name.php",
            r"<?php
            namespace App;
            /** @template T */
            interface Comparable {}
            /** @implements Comparable<string> */
            class Name implements Comparable {}",
        )
        .context();
    let name = ctx.structure("App\\Name").unwrap();
    let interfaces = name.interfaces(&ctx).unwrap();

    assert_eq!(interfaces.len(), 1);
    assert_eq!(structure_name(&interfaces[0]), Some("App\\Comparable"));
    assert_eq!(interfaces[0].generics(), &[VarType::named("string")]);
}

#[test]
fn test_template_shadows_class_of_same_name() {
    let ctx = TestProject::new()
        .file(
            "src/Holder.php",
            r"<?php
            namespace App;
            class T {}
            /** @template T */
            class Holder {
                /** @param T $x */
                public function set($x): void {}

                /**
                 * @template U
                 * @param U $other
                 * @return T
                 */
                public function swap($other) {}

                public function plain(T $x): void {}
            }",
        )
        .context();
    let holder = ctx.structure("App\\Holder").unwrap();
    let methods = holder.methods(&ctx).unwrap();

    assert_eq!(methods["set"].parameters[0].doc_type, VarType::Template("T".into()));
    assert_eq!(methods["swap"].parameters[0].doc_type, VarType::Template("U".into()));
    assert_eq!(methods["swap"].return_doc_type, VarType::Template("T".into()));
    assert_eq!(methods["swap"].templates[0].name, "U");
    // Native hints name real classes
    assert_eq!(structure_name(&methods["plain"].parameters[0].ty), Some("App\\T"));
}

#[test]
fn test_cyclic_references_share_descriptors() {
    let ctx = TestProject::new()
        .file(
            "src/Cycle.php",
            r"<?php
            namespace App;
            /** @template T */
            interface Ordered {}
            class A extends B {}
            /** @implements Ordered<A> */
            class B implements Ordered {}",
        )
        .context();
    let a = ctx.structure("App\\A").unwrap();
    let b = ctx.structure("App\\B").unwrap();

    let parent = a.parent(&ctx).unwrap().expect("A has a parent");
    assert_eq!(parent.structure_id(), Some(b.id()));

    let interfaces = b.interfaces(&ctx).unwrap();
    assert_eq!(interfaces.len(), 1);
    let argument = &interfaces[0].generics()[0];
    assert_eq!(argument.structure_id(), Some(a.id()));
    let shared = ctx.structure_by_id(a.id()).unwrap();
    assert!(Rc::ptr_eq(&shared, &a));
}

#[test]
fn test_union_and_intersection() {
    let ctx = TestProject::new()
        .file("src/Bag.php", "<?php namespace App; class Bag {}")
        .context();

    let union = resolve_in(&ctx, "App\\Bag", "int|string").unwrap();
    assert_eq!(
        union,
        VarType::Union(vec![VarType::named("int"), VarType::named("string")])
    );

    let intersection = resolve_in(&ctx, "App\\Bag", "Countable&ArrayAccess").unwrap();
    let VarType::Intersection(members) = intersection else {
        panic!("expected an intersection, got {intersection:?}");
    };
    let names: Vec<Option<&str>> = members.iter().map(structure_name).collect();
    assert_eq!(names, vec![Some("Countable"), Some("ArrayAccess")]);
}

#[test]
fn test_unmodelled_literal_is_fatal() {
    let ctx = TestProject::new()
        .file(
            "src/Odd.php",
            r"<?php
            class Odd {
                /** @return 1.5 */
                public function ratio() {}
            }",
        )
        .context();
    let odd = ctx.structure("Odd").unwrap();

    let node = TypeNode::Const(ConstExpr::Float("1.5".into()));
    let direct = odd.resolver(&ctx).resolve_from_node(&node, None);
    assert!(matches!(direct, Err(ResolveError::Unreachable { .. })));

    assert!(matches!(odd.methods(&ctx), Err(ResolveError::Unreachable { .. })));
}

#[test]
fn test_box_and_wrapper() {
    let ctx = TestProject::new()
        .file(
            "src/Box.php",
            r"<?php
            namespace App;
            /** @template T */
            class Box {
                /** @var T */
                public $value;
            }
            class Wrapper implements \IteratorAggregate {
                public function getIterator(): \Iterator {}
            }",
        )
        .context();

    let box_info = ctx.structure("App\\Box").unwrap();
    let properties = box_info.properties(&ctx).unwrap();
    assert_eq!(properties[0].name, "value");
    assert_eq!(properties[0].ty, VarType::Template("T".into()));
    assert_eq!(properties[0].native_type, None);

    let wrapper = ctx.structure("App\\Wrapper").unwrap();
    let interfaces = wrapper.interfaces(&ctx).unwrap();
    assert_eq!(interfaces.len(), 1);
    assert_eq!(structure_name(&interfaces[0]), Some("IteratorAggregate"));
    assert!(interfaces[0].generics().is_empty());
    assert_eq!(
        ctx.url_of(&interfaces[0]).as_deref(),
        Some("https://www.php.net/manual/en/class.iteratoraggregate.php")
    );
    assert_eq!(wrapper.url(&ctx).as_deref(), Some("classes/app/wrapper.html"));
}

#[test]
fn test_trait_aliases_and_insteadof_origins() {
    let ctx = TestProject::new()
        .file(
            "src/Greeter.php",
            r"<?php
            namespace App;
            trait Hello { public function hello() {} }
            trait World {
                public function hello() {}
                public function world() {}
            }
            class Greeter {
                use Hello, World {
                    World::hello insteadof Hello;
                    Hello::hello as helloFromHello;
                }
                public function own() {}
            }
            class Child extends Greeter {}",
        )
        .context();
    let greeter = ctx.structure("App\\Greeter").unwrap();
    let methods = greeter.methods(&ctx).unwrap();
    let origin = |name: &str| {
        methods[name]
            .declaring_origin
            .as_ref()
            .and_then(|o| structure_name(o).map(str::to_string))
    };
    assert_eq!(origin("hello").as_deref(), Some("App\\World"));
    assert_eq!(origin("helloFromHello").as_deref(), Some("App\\Hello"));
    assert_eq!(origin("world").as_deref(), Some("App\\World"));
    assert_eq!(origin("own"), None);

    let child = ctx.structure("App\\Child").unwrap();
    let inherited = child.method(&ctx, "own").unwrap().expect("inherited");
    assert_eq!(
        inherited.declaring_origin.as_ref().and_then(structure_name),
        Some("App\\Greeter")
    );
}

#[test]
fn test_trait_origin_survives_inheritance() {
    let ctx = TestProject::new()
        .file(
            "src/Greets.php",
            r"<?php
            namespace App;
            /** @template T */
            trait Greets { public function hello() {} }
            trait Waves { public function wave() {} }
            class Base {
                /** @use Greets<int> */
                use Greets;
                use Waves;
            }
            class Child extends Base {}",
        )
        .context();

    let base = ctx.structure("App\\Base").unwrap();
    let own = base.method(&ctx, "hello").unwrap().expect("from trait");
    assert_eq!(
        own.declaring_origin.as_ref().map(ToString::to_string).as_deref(),
        Some("App\\Greets<int>")
    );

    let child = ctx.structure("App\\Child").unwrap();
    let hello = child.method(&ctx, "hello").unwrap().expect("inherited");
    assert_eq!(
        hello.declaring_origin.as_ref().map(ToString::to_string).as_deref(),
        Some("App\\Greets<int>")
    );
    let wave = child.method(&ctx, "wave").unwrap().expect("inherited");
    assert_eq!(
        wave.declaring_origin.as_ref().and_then(structure_name),
        Some("App\\Waves")
    );
    assert_eq!(hello.declaring_class, "App\\Base");
}

#[test]
fn test_property_visibility_and_promotion() {
    let ctx = TestProject::new()
        .file(
            "src/Account.php",
            r"<?php
            namespace App;
            final class Account {
                public private(set) int $balance = 0;
                public protected(set) ?string $note = null;
                protected private(set) string $owner;
                public static $count;

                /** @param list<string> $tags */
                public function __construct(
                    public readonly array $tags,
                    private int $id = 0,
                ) {}
            }",
        )
        .context();
    let account = ctx.structure("App\\Account").unwrap();
    let properties = account.properties(&ctx).unwrap();
    let find = |name: &str| properties.iter().find(|p| p.name == name).expect(name);

    assert_eq!(find("balance").visibility, PropertyVisibility::PublicPrivateSet);
    assert_eq!(find("balance").default_value.as_deref(), Some("0"));
    assert_eq!(find("note").visibility, PropertyVisibility::PublicProtectedSet);
    assert_eq!(
        find("note").ty,
        VarType::Union(vec![VarType::named("string"), VarType::null()])
    );
    assert_eq!(find("owner").visibility, PropertyVisibility::ProtectedPrivateSet);
    assert!(find("count").is_static);
    assert_eq!(find("count").ty, VarType::mixed());

    let tags = find("tags");
    assert!(tags.is_promoted);
    assert!(tags.is_readonly);
    assert_eq!(tags.ty.to_string(), "list<string>");
    assert_eq!(tags.native_type, Some(VarType::named("array")));
    assert_eq!(find("id").visibility, PropertyVisibility::Private);
    assert!(!find("id").is_readonly);

    let constructor = account.method(&ctx, "__construct").unwrap().expect("constructor");
    assert!(constructor.parameters.iter().all(|p| p.is_promoted));
    assert_eq!(constructor.parameters[1].default_value.as_deref(), Some("0"));
    assert_eq!(constructor.id, "method-construct");
}

#[test]
fn test_param_tags_first_wins_and_prefix_overrides() {
    let ctx = TestProject::new()
        .file(
            "src/Math.php",
            r"<?php
            class Math {
                /**
                 * @param int $a first
                 * @param string $a ignored
                 * @param int $b
                 * @phpstan-param positive-int $b
                 * @return int
                 * @psalm-return non-negative-int
                 */
                public function add($a, $b) {}
            }",
        )
        .context();
    let math = ctx.structure("Math").unwrap();
    let add = math.method(&ctx, "add").unwrap().expect("add");

    assert_eq!(add.parameters[0].doc_type, VarType::named("int"));
    assert_eq!(add.parameters[0].description, "first");
    assert_eq!(add.parameters[1].doc_type, VarType::named("positive-int"));
    assert_eq!(add.return_doc_type, VarType::named("non-negative-int"));
    assert_eq!(add.return_type, VarType::mixed());
}

#[test]
fn test_inherited_members_resolve_where_declared() {
    let ctx = TestProject::new()
        .file(
            "src/Lib.php",
            r"<?php
            namespace Lib\Support;
            class Collection {}

            namespace Lib;
            use Lib\Support\Collection as Items;
            class Base {
                /** @return Items */
                public function all() {}
            }",
        )
        .file(
            "src/Repo.php",
            r"<?php
            namespace App;
            class Items {}
            class Repo extends \Lib\Base {}",
        )
        .context();
    let repo = ctx.structure("App\\Repo").unwrap();
    let all = repo.method(&ctx, "all").unwrap().expect("inherited");

    assert_eq!(structure_name(&all.return_doc_type), Some("Lib\\Support\\Collection"));
    assert_eq!(all.declaring_class, "Lib\\Base");
    assert_eq!(
        all.declaring_origin.as_ref().and_then(structure_name),
        Some("Lib\\Base")
    );
}

#[test]
fn test_enum_cases_and_interfaces() {
    let ctx = TestProject::new()
        .file(
            "src/Suit.php",
            r"<?php
            namespace App;
            enum Suit: string implements \JsonSerializable {
                case Hearts = 'H';
                case Spades = 'S';
                const Wild = self::Spades;
                public function jsonSerialize(): mixed {}
            }",
        )
        .context();
    let suit = ctx.structure("App\\Suit").unwrap();
    let constants = suit.constants(&ctx).unwrap();
    let cases: Vec<&str> = constants
        .iter()
        .filter(|c| c.is_case)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(cases, vec!["Hearts", "Spades"]);
    assert!(constants.iter().any(|c| c.name == "Wild" && !c.is_case));

    let methods = suit.methods(&ctx).unwrap();
    assert!(methods.contains_key("from"));
    assert!(methods.contains_key("cases"));
    let json = &methods["jsonSerialize"];
    assert_eq!(
        json.interface_origins
            .iter()
            .filter_map(structure_name)
            .collect::<Vec<_>>(),
        vec!["JsonSerializable"]
    );
}
