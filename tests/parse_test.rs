// Template parsing through the public API

use uritmpl::domain::template::{Modifier, Operator, ParseErrorKind, Part, Template};

#[test]
fn test_parse_round_trips_source_text() {
    for source in [
        "",
        "/static/path",
        "{var}",
        "http://example.com/{+path:6}/here{?q,list*}{#frag}",
        "/users{/id}{;v}{.fmt}{&x|1}",
        "{var:030}",
    ] {
        let template: Template = source.parse().unwrap();
        let rebuilt: String = template.parts().iter().map(Part::source).collect();
        assert_eq!(rebuilt, source);
        assert_eq!(template.to_string(), source);
    }
}

#[test]
fn test_parse_structure() {
    let template = Template::parse("/search{?q,tags*,lang:2}").unwrap();
    assert_eq!(template.parts().len(), 2);

    match &template.parts()[1] {
        Part::Expression(expr) => {
            assert_eq!(expr.operator, Operator::Query);
            assert_eq!(expr.vars.len(), 3);
            assert_eq!(expr.vars[1].modifier, Some(Modifier::Explode));
            assert_eq!(expr.vars[2].modifier, Some(Modifier::Prefix(2)));
        }
        other => panic!("Expected expression, got {:?}", other),
    }
}

#[test]
fn test_variable_names_are_distinct() {
    let template = Template::parse("{/var:1,var}{?var,x}").unwrap();
    assert_eq!(template.variable_names(), vec!["var", "x"]);
    assert_eq!(template.variables().len(), 4);
}

#[test]
fn test_parse_errors() {
    let cases = [
        ("{open", ParseErrorKind::UnmatchedOpenBrace),
        ("close}", ParseErrorKind::UnmatchedCloseBrace),
        ("{}", ParseErrorKind::EmptyExpression),
        ("{bad name}", ParseErrorKind::InvalidVariableName("bad name".to_string())),
        ("{var:x}", ParseErrorKind::InvalidPrefix("var:x".to_string())),
        ("{var|a&b}", ParseErrorKind::InvalidDefaultValue("a&b".to_string())),
    ];

    for (source, kind) in cases {
        let err = Template::parse(source).unwrap_err();
        assert_eq!(err.kind, kind, "parsing {}", source);
        assert_eq!(err.template, source);
    }
}
