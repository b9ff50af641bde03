//! Rendering objects, nested graphs and arrays through templates.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::executor::block_on;
use portrait::{
    DefineOptions, Field, FormatError, Record, Registry, RenderOptions, RepresentError,
    Representable, Representation, Value,
};

#[derive(Representable, Default)]
#[represent(rename_all = "camelCase")]
struct User {
    first_name: Option<String>,
    last_name: Option<String>,
    car: Option<Arc<Car>>,
}

#[derive(Representable, Default)]
struct Car {
    year: i64,
    make: String,
}

fn user(first: &str, last: &str) -> Value {
    Value::from(Arc::new(User {
        first_name: Some(first.into()),
        last_name: Some(last.into()),
        car: None,
    }))
}

fn render(registry: &Registry, target: &Value, name: &str) -> portrait::Result<Representation> {
    block_on(registry.represent(target, name, RenderOptions::default()))
}

fn string_at<'a>(rep: &'a Representation, key: &str) -> Option<&'a str> {
    rep.get(key).and_then(|v| v.as_str())
}

#[test]
fn requires_a_template_name() {
    let registry = Registry::new();
    registry
        .define_for_type::<User>("public", [], DefineOptions::default())
        .unwrap();

    let err = render(&registry, &user("Davos", "Seaworth"), "").unwrap_err();
    assert!(matches!(err, RepresentError::MissingTemplateName));
}

#[test]
fn requires_a_known_template_name() {
    let registry = Registry::new();
    registry
        .define_for_type::<User>("public", [], DefineOptions::default())
        .unwrap();

    let err = render(&registry, &user("Davos", "Seaworth"), "alternative").unwrap_err();
    assert_eq!(err.to_string(), "template 'alternative' not found for User");
}

#[test]
fn empty_template_renders_empty_map() {
    let registry = Registry::new();
    registry
        .define_for_type::<User>("public", [], DefineOptions::default())
        .unwrap();

    let rep = render(&registry, &user("Davos", "Seaworth"), "public").unwrap();
    assert!(rep.as_map().unwrap().is_empty());
}

#[test]
fn renders_simple_properties() {
    let registry = Registry::new();
    registry
        .define_for_type::<User>(
            "public",
            [Field::new("firstName"), Field::new("lastName")],
            DefineOptions::default(),
        )
        .unwrap();

    let rep = render(&registry, &user("Davos", "Seaworth"), "public").unwrap();
    assert_eq!(string_at(&rep, "firstName"), Some("Davos"));
    assert_eq!(string_at(&rep, "lastName"), Some("Seaworth"));
    assert_eq!(
        rep.as_map().unwrap().keys().collect::<Vec<_>>(),
        vec!["firstName", "lastName"]
    );
}

#[test]
fn untemplated_object_property_passes_through() {
    let registry = Registry::new();
    let davos = Value::from(
        Record::new()
            .with("firstName", "Davos")
            .with("car", Record::new().with("year", 2001).with("make", "Ford")),
    );
    registry
        .define_for_instance(
            &davos,
            "public",
            [Field::new("firstName"), Field::new("car")],
            DefineOptions::default(),
        )
        .unwrap();

    let rep = render(&registry, &davos, "public").unwrap();
    assert_eq!(string_at(&rep, "firstName"), Some("Davos"));
    let car = rep.get("car").unwrap();
    assert_eq!(car.get("year").and_then(|v| v.as_number()), Some(2001.into()));
    assert_eq!(string_at(car, "make"), Some("Ford"));
}

#[test]
fn property_rendered_with_alternative_template() {
    let registry = Registry::new();
    let car = Arc::new(Car {
        year: 2012,
        make: "BMW".into(),
    });
    let davos = Value::from(Arc::new(User {
        first_name: Some("Davos".into()),
        last_name: None,
        car: Some(car.clone()),
    }));

    registry
        .define_for_instance(
            &davos,
            "public",
            [Field::new("firstName"), Field::new("car").template("different")],
            DefineOptions::default(),
        )
        .unwrap();
    registry
        .define_for_instance(&Value::from(car), "different", [], DefineOptions::default())
        .unwrap();

    let rep = render(&registry, &davos, "public").unwrap();
    assert_eq!(string_at(&rep, "firstName"), Some("Davos"));
    let car = rep.get("car").unwrap();
    assert!(!car.contains_key("year"));
    assert!(!car.contains_key("make"));
}

#[test]
fn nested_objects_inherit_active_template() {
    let registry = Registry::new();
    registry
        .define_for_type::<User>(
            "public",
            [Field::new("firstName"), Field::new("car")],
            DefineOptions::default(),
        )
        .unwrap();
    registry
        .define_for_type::<Car>("public", [Field::new("make")], DefineOptions::default())
        .unwrap();

    let davos = Value::from(Arc::new(User {
        first_name: Some("Davos".into()),
        last_name: None,
        car: Some(Arc::new(Car {
            year: 2012,
            make: "BMW".into(),
        })),
    }));

    let rep = render(&registry, &davos, "public").unwrap();
    let car = rep.get("car").unwrap();
    assert_eq!(string_at(car, "make"), Some("BMW"));
    assert!(!car.contains_key("year"));
}

#[test]
fn renders_an_array_in_order() {
    let registry = Registry::new();
    let fields = [Field::new("firstName"), Field::new("lastName")];
    let davos = user("Davos", "Seaworth");
    let sandor = user("Sandor", "Clegane");
    registry
        .define_for_instance(&davos, "public", fields.clone(), DefineOptions::default())
        .unwrap();
    registry
        .define_for_instance(&sandor, "public", fields, DefineOptions::default())
        .unwrap();

    let rep = render(&registry, &Value::Array(vec![davos, sandor]), "public").unwrap();
    let items = rep.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(string_at(&items[0], "firstName"), Some("Davos"));
    assert_eq!(string_at(&items[0], "lastName"), Some("Seaworth"));
    assert_eq!(string_at(&items[1], "firstName"), Some("Sandor"));
    assert_eq!(string_at(&items[1], "lastName"), Some("Clegane"));
}

#[test]
fn empty_array_renders_empty_array() {
    let registry = Registry::new();
    let rep = render(&registry, &Value::Array(Vec::new()), "public").unwrap();
    assert_eq!(rep, Representation::Array(Vec::new()));
}

#[test]
fn array_fails_if_any_element_lacks_the_template() {
    let registry = Registry::new();
    let davos = user("Davos", "Seaworth");
    registry
        .define_for_instance(&davos, "public", [], DefineOptions::default())
        .unwrap();

    let target = Value::Array(vec![davos, user("Sandor", "Clegane")]);
    let err = render(&registry, &target, "public").unwrap_err();
    assert!(matches!(err, RepresentError::TemplateNotFound { .. }));
}

#[test]
fn array_property_passes_through() {
    let registry = Registry::new();
    let target = Value::from(Record::new().with("test", vec!["one", "two"]));
    registry
        .define_for_instance(&target, "public", [Field::new("test")], DefineOptions::default())
        .unwrap();

    let rep = render(&registry, &target, "public").unwrap();
    assert_eq!(
        rep.get("test"),
        Some(&Representation::from(vec!["one", "two"]))
    );
}

#[test]
fn array_property_renders_templated_elements() {
    let registry = Registry::new();
    registry
        .define_for_type::<Car>("public", [Field::new("make")], DefineOptions::default())
        .unwrap();
    let cars = vec![
        Arc::new(Car {
            year: 2001,
            make: "Ford".into(),
        }),
        Arc::new(Car {
            year: 2012,
            make: "BMW".into(),
        }),
    ];
    let garage = Value::from(Record::new().with("cars", cars));
    registry
        .define_for_instance(&garage, "public", [Field::new("cars")], DefineOptions::default())
        .unwrap();

    let rep = render(&registry, &garage, "public").unwrap();
    let makes: Vec<_> = rep
        .get("cars")
        .and_then(|v| v.as_array())
        .unwrap()
        .iter()
        .map(|car| string_at(car, "make").unwrap())
        .collect();
    assert_eq!(makes, vec!["Ford", "BMW"]);
}

#[test]
fn formatter_output_replaces_value() {
    let registry = Registry::new();
    let davos = user("Davos", "Seaworth");
    registry
        .define_for_instance(
            &davos,
            "public",
            [Field::new("firstName").formatter(|v| v.as_str().map(|s| s[..1].to_string()))],
            DefineOptions::default(),
        )
        .unwrap();

    let rep = render(&registry, &davos, "public").unwrap();
    assert_eq!(string_at(&rep, "firstName"), Some("D"));
}

#[test]
fn formatter_output_is_not_rendered_again() {
    let registry = Registry::new();
    registry
        .define_for_type::<Car>("public", [Field::new("make")], DefineOptions::default())
        .unwrap();
    let car = Arc::new(Car {
        year: 2012,
        make: "BMW".into(),
    });
    let davos = Value::from(Arc::new(User {
        car: Some(car),
        ..User::default()
    }));
    registry
        .define_for_instance(
            &davos,
            "public",
            [Field::new("car").formatter(|v| if v.is_object() { "a car" } else { "none" })],
            DefineOptions::default(),
        )
        .unwrap();

    let rep = render(&registry, &davos, "public").unwrap();
    assert_eq!(string_at(&rep, "car"), Some("a car"));
}

#[test]
fn async_formatter_is_awaited() {
    let registry = Registry::new();
    let davos = user("Davos", "Seaworth");
    registry
        .define_for_instance(
            &davos,
            "public",
            [Field::new("lastName").async_formatter(|v: Value| async move {
                Ok::<_, FormatError>(v.as_str().map(str::to_uppercase))
            })],
            DefineOptions::default(),
        )
        .unwrap();

    let rep = render(&registry, &davos, "public").unwrap();
    assert_eq!(string_at(&rep, "lastName"), Some("SEAWORTH"));
}

#[test]
fn formatter_failure_aborts_the_render() {
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let davos = user("Davos", "Seaworth");
    registry
        .define_for_instance(
            &davos,
            "public",
            [
                Field::new("firstName").try_formatter(|_| Err::<String, _>("lookup failed")),
                Field::new("lastName").formatter(move |v| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    v.as_str().map(String::from)
                }),
            ],
            DefineOptions::default(),
        )
        .unwrap();

    let err = render(&registry, &davos, "public").unwrap_err();
    match err {
        RepresentError::FieldResolution { field, source } => {
            assert_eq!(field, "firstName");
            assert_eq!(source.to_string(), "lookup failed");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn strips_undefined_values_by_default() {
    let registry = Registry::new();
    let target = Value::from(Arc::new(User {
        last_name: Some("Seaworth".into()),
        ..User::default()
    }));
    registry
        .define_for_instance(
            &target,
            "public",
            [Field::new("firstName"), Field::new("lastName")],
            DefineOptions::default(),
        )
        .unwrap();

    let rep = render(&registry, &target, "public").unwrap();
    assert!(!rep.contains_key("firstName"));
    assert_eq!(string_at(&rep, "lastName"), Some("Seaworth"));
}

#[test]
fn keeps_undefined_values_when_asked() {
    let registry = Registry::new();
    let target = Value::from(Arc::new(User {
        last_name: Some("Seaworth".into()),
        ..User::default()
    }));
    registry
        .define_for_instance(
            &target,
            "public",
            [Field::new("firstName"), Field::new("lastName")],
            DefineOptions::default(),
        )
        .unwrap();

    let options = RenderOptions::default().strip_undefined(false);
    let rep = block_on(registry.represent(&target, "public", options)).unwrap();
    assert_eq!(rep.get("firstName"), Some(&Representation::Absent));
    assert_eq!(string_at(&rep, "lastName"), Some("Seaworth"));
}

#[test]
fn null_is_not_stripped() {
    let registry = Registry::new();
    let target = Value::from(Record::new().with("nickname", Value::Null));
    registry
        .define_for_instance(&target, "public", [Field::new("nickname")], DefineOptions::default())
        .unwrap();

    let rep = render(&registry, &target, "public").unwrap();
    assert_eq!(rep.get("nickname"), Some(&Representation::Null));
}

#[test]
fn callback_runs_exactly_once() {
    let registry = Registry::new();
    let davos = user("Davos", "Seaworth");
    registry
        .define_for_instance(&davos, "public", [Field::new("firstName")], DefineOptions::default())
        .unwrap();

    let calls = Cell::new(0);
    block_on(registry.represent_with(&davos, "public", RenderOptions::default(), |result| {
        calls.set(calls.get() + 1);
        let rep = result.unwrap();
        assert_eq!(string_at(&rep, "firstName"), Some("Davos"));
    }));
    assert_eq!(calls.get(), 1);

    block_on(registry.represent_with(&davos, "missing", RenderOptions::default(), |result| {
        calls.set(calls.get() + 1);
        assert!(result.is_err());
    }));
    assert_eq!(calls.get(), 2);
}

#[test]
fn blocking_render_matches_async_render() {
    let registry = Registry::new();
    let davos = user("Davos", "Seaworth");
    registry
        .define_for_instance(&davos, "public", [Field::new("lastName")], DefineOptions::default())
        .unwrap();

    let blocking = registry
        .represent_blocking(&davos, "public", RenderOptions::default())
        .unwrap();
    assert_eq!(blocking, render(&registry, &davos, "public").unwrap());
}

#[test]
fn cyclic_graph_hits_depth_limit() {
    let registry = Registry::new();
    let node = Record::new().with("name", "root").into_object();
    let parent = Value::from(Record::new().with("child", Value::from(node.clone())));
    registry
        .define_for_instance(
            &Value::from(node.clone()),
            "tree",
            [Field::new("name")],
            DefineOptions::default(),
        )
        .unwrap();
    registry
        .define_for_instance(&parent, "tree", [Field::new("child")], DefineOptions::default())
        .unwrap();

    let shallow = RenderOptions::default().max_depth(0);
    let err = block_on(registry.represent(&parent, "tree", shallow)).unwrap_err();
    assert!(matches!(err, RepresentError::DepthLimitExceeded { limit: 0 }));

    let rep = render(&registry, &parent, "tree").unwrap();
    assert_eq!(
        rep.get("child").and_then(|c| c.get("name")).and_then(|v| v.as_str()),
        Some("root")
    );
}

#[test]
fn global_registry_free_functions() {
    #[derive(Representable)]
    struct Ship {
        name: String,
    }

    portrait::define_for_type::<Ship>("public", [Field::new("name")], DefineOptions::default())
        .unwrap();
    let ship = Value::from(Arc::new(Ship {
        name: "Black Betha".into(),
    }));

    let rep = block_on(portrait::represent(&ship, "public", RenderOptions::default())).unwrap();
    assert_eq!(string_at(&rep, "name"), Some("Black Betha"));
    assert!(portrait::global().template_for_type::<Ship>("public").is_some());
}

#[test]
fn depth_limit_counts_only_objects() {
    let registry = Registry::new();

    let flat = Value::from(Record::new().with("name", "x"));
    registry
        .define_for_instance(&flat, "public", [Field::new("name")], DefineOptions::default())
        .unwrap();
    let options = RenderOptions::default().max_depth(0);
    let rep = block_on(registry.represent(&flat, "public", options)).unwrap();
    assert_eq!(string_at(&rep, "name"), Some("x"));

    let child = Value::from(Record::new().with("name", "child"));
    let parent = Value::from(Record::new().with("child", child.clone()));
    registry
        .define_for_instance(&child, "public", [Field::new("name")], DefineOptions::default())
        .unwrap();
    registry
        .define_for_instance(&parent, "public", [Field::new("child")], DefineOptions::default())
        .unwrap();
    let options = RenderOptions::default().max_depth(1);
    let rep = block_on(registry.represent(&parent, "public", options)).unwrap();
    assert_eq!(
        rep.get("child").and_then(|c| c.get("name")).and_then(|v| v.as_str()),
        Some("child")
    );
}

#[test]
fn deeply_nested_arrays_pass_through() {
    let registry = Registry::new();
    let mut nested = Value::from("leaf");
    for _ in 0..70 {
        nested = Value::Array(vec![nested]);
    }
    let target = Value::from(Record::new().with("nested", nested));
    registry
        .define_for_instance(&target, "public", [Field::new("nested")], DefineOptions::default())
        .unwrap();

    let rep = render(&registry, &target, "public").unwrap();
    let mut current = rep.get("nested").unwrap();
    for _ in 0..70 {
        current = &current.as_array().unwrap()[0];
    }
    assert_eq!(current.as_str(), Some("leaf"));
}

#[test]
fn untemplated_objects_count_toward_depth() {
    let registry = Registry::new();
    let target = Value::from(
        Record::new().with("car", Record::new().with("engine", Record::new().with("hp", 300))),
    );
    registry
        .define_for_instance(&target, "public", [Field::new("car")], DefineOptions::default())
        .unwrap();

    let err = block_on(registry.represent(&target, "public", RenderOptions::default().max_depth(1)))
        .unwrap_err();
    assert!(matches!(err, RepresentError::DepthLimitExceeded { limit: 1 }));

    let rep = block_on(registry.represent(&target, "public", RenderOptions::default().max_depth(2)))
        .unwrap();
    let hp = rep.get("car").and_then(|c| c.get("engine")).and_then(|e| e.get("hp"));
    assert_eq!(hp, Some(&Representation::from(300)));
}
