// RFC 6570 expansion examples, levels 1 through 4

use uritmpl::domain::template::{ExpansionError, Template, VariableValues};

mod common;

fn expand(template: &str, values: &VariableValues) -> String {
    Template::parse(template)
        .unwrap_or_else(|e| panic!("{} should parse: {}", template, e))
        .expand(values)
        .unwrap_or_else(|e| panic!("{} should expand: {}", template, e))
}

fn assert_expansions(cases: &[(&str, &str)]) {
    let values = common::rfc_values();
    for (template, expected) in cases {
        assert_eq!(&expand(template, &values), expected, "expanding {}", template);
    }
}

fn assert_one_of(template: &str, candidates: Vec<String>) {
    let actual = expand(template, &common::rfc_values());
    assert!(
        candidates.contains(&actual),
        "{} expanded to {}, expected one of {:?}",
        template,
        actual,
        candidates
    );
}

#[test]
fn test_level1_simple_string() {
    assert_expansions(&[("{var}", "value"), ("{hello}", "Hello%20World%21")]);
}

#[test]
fn test_level2_reserved_and_fragment() {
    assert_expansions(&[
        ("{+var}", "value"),
        ("{+hello}", "Hello%20World!"),
        ("{+path}/here", "/foo/bar/here"),
        ("here?ref={+path}", "here?ref=/foo/bar"),
        ("X{#var}", "X#value"),
        ("X{#hello}", "X#Hello%20World!"),
    ]);
}

#[test]
fn test_level3_multiple_variables() {
    assert_expansions(&[
        ("map?{x,y}", "map?1024,768"),
        ("{x,hello,y}", "1024,Hello%20World%21,768"),
        ("{+x,hello,y}", "1024,Hello%20World!,768"),
        ("{+path,x}/here", "/foo/bar,1024/here"),
        ("{#x,hello,y}", "#1024,Hello%20World!,768"),
        ("{#path,x}/here", "#/foo/bar,1024/here"),
        ("X{.var}", "X.value"),
        ("X{.x,y}", "X.1024.768"),
        ("{/var}", "/value"),
        ("{/var,x}/here", "/value/1024/here"),
        ("{;x,y}", ";x=1024;y=768"),
        ("{;x,y,empty}", ";x=1024;y=768;empty"),
        ("{?x,y}", "?x=1024&y=768"),
        ("{?x,y,empty}", "?x=1024&y=768&empty="),
        ("?fixed=yes{&x}", "?fixed=yes&x=1024"),
        ("{&x,y,empty}", "&x=1024&y=768&empty="),
    ]);
}

#[test]
fn test_level4_prefix_and_lists() {
    assert_expansions(&[
        ("{var:3}", "val"),
        ("{var:30}", "value"),
        ("{list}", "red,green,blue"),
        ("{list*}", "red,green,blue"),
        ("{+path:6}/here", "/foo/b/here"),
        ("{+list}", "red,green,blue"),
        ("{+list*}", "red,green,blue"),
        ("{#path:6}/here", "#/foo/b/here"),
        ("{#list}", "#red,green,blue"),
        ("{#list*}", "#red,green,blue"),
        ("X{.var:3}", "X.val"),
        ("X{.list}", "X.red,green,blue"),
        ("X{.list*}", "X.red.green.blue"),
        ("{/var:1,var}", "/v/value"),
        ("{/list}", "/red,green,blue"),
        ("{/list*}", "/red/green/blue"),
        ("{/list*,path:4}", "/red/green/blue/%2Ffoo"),
        ("{;hello:5}", ";hello=Hello"),
        ("{;list}", ";list=red,green,blue"),
        ("{;list*}", ";list=red;list=green;list=blue"),
        ("{?var:3}", "?var=val"),
        ("{?list}", "?list=red,green,blue"),
        ("{?list*}", "?list=red&list=green&list=blue"),
        ("{&var:3}", "&var=val"),
        ("{&list}", "&list=red,green,blue"),
        ("{&list*}", "&list=red&list=green&list=blue"),
    ]);
}

#[test]
fn test_level4_maps_in_any_key_order() {
    let strict = ["semi,%3B", "dot,.", "comma,%2C"];
    let strict_exploded = ["semi=%3B", "dot=.", "comma=%2C"];
    let reserved = ["semi,;", "dot,.", "comma,,"];
    let reserved_exploded = ["semi=;", "dot=.", "comma=,"];

    assert_one_of("{keys}", common::orderings("", &strict, ","));
    assert_one_of("{keys*}", common::orderings("", &strict_exploded, ","));
    assert_one_of("{+keys}", common::orderings("", &reserved, ","));
    assert_one_of("{+keys*}", common::orderings("", &reserved_exploded, ","));
    assert_one_of("{#keys}", common::orderings("#", &reserved, ","));
    assert_one_of("{#keys*}", common::orderings("#", &reserved_exploded, ","));
    assert_one_of("X{.keys}", common::orderings("X.", &strict, ","));
    assert_one_of("X{.keys*}", common::orderings("X.", &strict_exploded, "."));
    assert_one_of("{/keys}", common::orderings("/", &strict, ","));
    assert_one_of("{/keys*}", common::orderings("/", &strict_exploded, "/"));
    assert_one_of("{;keys}", common::orderings(";keys=", &strict, ","));
    assert_one_of("{;keys*}", common::orderings(";", &strict_exploded, ";"));
    assert_one_of("{?keys}", common::orderings("?keys=", &strict, ","));
    assert_one_of("{?keys*}", common::orderings("?", &strict_exploded, "&"));
    assert_one_of("{&keys}", common::orderings("&keys=", &strict, ","));
    assert_one_of("{&keys*}", common::orderings("&", &strict_exploded, "&"));
}

#[test]
fn test_undefined_and_empty_values() {
    assert_expansions(&[
        ("{undef}", ""),
        ("{?undef}", ""),
        ("{/undef,var}", "/value"),
        ("{?empty_keys}", ""),
        ("{?empty_keys*}", ""),
        ("{empty}", ""),
        ("X{.empty}", "X"),
        ("{;undef,empty}", ";empty"),
        ("{?undef,empty}", "?empty="),
    ]);
}

#[test]
fn test_percent_handling() {
    assert_expansions(&[
        ("{half}", "50%25"),
        ("{+half}", "50%25"),
        ("{dub}", "me%2Ftoo"),
        ("{+dub}", "me/too"),
        ("{+base}index", "http://example.com/home/index"),
    ]);

    let values = common::values(serde_json::json!({"id": "admin%2F", "raw": "%zz"}));
    assert_eq!(expand("{+id}", &values), "admin%2F");
    assert_eq!(expand("{+raw}", &values), "%25zz");
    assert_eq!(expand("{id}", &values), "admin%252F");
}

#[test]
fn test_numbers_use_canonical_form() {
    let values = common::values(serde_json::json!({"lat": 37.76, "lon": -122.427, "n": 10, "f": 2.0}));
    assert_eq!(expand("{?lat,lon}", &values), "?lat=37.76&lon=-122.427");
    assert_eq!(expand("{/n,f}", &values), "/10/2");
}

#[test]
fn test_default_modifier() {
    let values = common::values(serde_json::json!({"q": "rust", "nothing": null}));
    assert_eq!(expand("/search{?q,lang|en}", &values), "/search?q=rust&lang=en");
    assert_eq!(expand("{/nothing|none}", &values), "/none");
}

#[test]
fn test_prefix_on_composite_is_an_error() {
    let template = Template::parse("{list:2}").unwrap();
    let err = template.expand(&common::rfc_values()).unwrap_err();
    assert_eq!(
        err,
        ExpansionError::PrefixOnComposite {
            name: "list".to_string()
        }
    );
}
