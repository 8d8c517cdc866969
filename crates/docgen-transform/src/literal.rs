//! Conversion between documentation values and literal expressions.

use indexmap::IndexMap;
use swc_common::DUMMY_SP;
use swc_ecma_ast::{
    ArrayLit, Bool, Expr, ExprOrSpread, Ident, IdentName, KeyValueProp, Lit, Null, Number, ObjectLit,
    Prop, PropName, PropOrSpread, Str, UnaryExpr, UnaryOp,
};

use crate::record::DocValue;

/// Builds a literal expression equivalent to `value`.
///
/// Returns `None` for a top-level [`DocValue::Undefined`]: there is no
/// literal for absence, and callers must decide what to emit instead.
/// Undefined entries inside an object are dropped; inside an array they
/// become holes.
pub fn serialize(value: &DocValue) -> Option<Expr> {
    let expr = match value {
        DocValue::Undefined => return None,
        DocValue::Null => Expr::Lit(Lit::Null(Null { span: DUMMY_SP })),
        DocValue::Bool(value) => Expr::Lit(Lit::Bool(Bool {
            span: DUMMY_SP,
            value: *value,
        })),
        DocValue::Number(value) => number_expr(*value),
        DocValue::String(value) => string_expr(value),
        DocValue::Array(items) => Expr::Array(ArrayLit {
            span: DUMMY_SP,
            elems: items
                .iter()
                .map(|item| {
                    serialize(item).map(|expr| ExprOrSpread {
                        spread: None,
                        expr: Box::new(expr),
                    })
                })
                .collect(),
        }),
        DocValue::Object(fields) => Expr::Object(object_lit(fields)),
    };
    Some(expr)
}

/// Reads a literal expression back into a value.
///
/// Accepts exactly the shapes [`serialize`] produces (plus parentheses), so
/// instrumented output can be inspected without evaluating JavaScript.
pub fn evaluate(expr: &Expr) -> Option<DocValue> {
    match expr {
        Expr::Lit(Lit::Null(_)) => Some(DocValue::Null),
        Expr::Lit(Lit::Bool(value)) => Some(DocValue::Bool(value.value)),
        Expr::Lit(Lit::Num(number)) => Some(DocValue::Number(number.value)),
        Expr::Lit(Lit::Str(value)) => Some(DocValue::String(
            value.value.to_string_lossy().into_owned(),
        )),
        Expr::Unary(UnaryExpr {
            op: UnaryOp::Minus,
            arg,
            ..
        }) => match arg.as_ref() {
            Expr::Lit(Lit::Num(number)) => Some(DocValue::Number(-number.value)),
            _ => None,
        },
        Expr::Paren(paren) => evaluate(&paren.expr),
        Expr::Array(array) => array
            .elems
            .iter()
            .map(|elem| match elem {
                Some(ExprOrSpread { spread: None, expr }) => evaluate(expr),
                Some(_) => None,
                None => Some(DocValue::Undefined),
            })
            .collect::<Option<Vec<_>>>()
            .map(DocValue::Array),
        Expr::Object(object) => {
            let mut fields = IndexMap::new();
            for prop in &object.props {
                let PropOrSpread::Prop(prop) = prop else {
                    return None;
                };
                let Prop::KeyValue(KeyValueProp { key, value }) = prop.as_ref() else {
                    return None;
                };
                let key = match key {
                    PropName::Ident(ident) => ident.sym.to_string(),
                    PropName::Str(value) => value.value.to_string_lossy().into_owned(),
                    _ => return None,
                };
                fields.insert(key, evaluate(value)?);
            }
            Some(DocValue::Object(fields))
        }
        _ => None,
    }
}

pub(crate) fn string_expr(value: &str) -> Expr {
    Expr::Lit(Lit::Str(Str::from(value)))
}

fn number_expr(value: f64) -> Expr {
    // Sign bit rather than `< 0.0` so that `-0` survives.
    if value.is_sign_negative() && !value.is_nan() {
        return Expr::Unary(UnaryExpr {
            span: DUMMY_SP,
            op: UnaryOp::Minus,
            arg: Box::new(number_expr(-value)),
        });
    }
    Expr::Lit(Lit::Num(Number {
        span: DUMMY_SP,
        value,
        raw: None,
    }))
}

fn object_lit(fields: &IndexMap<String, DocValue>) -> ObjectLit {
    let props = fields
        .iter()
        .filter_map(|(key, value)| {
            let value = serialize(value)?;
            Some(PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
                key: prop_name(key),
                value: Box::new(value),
            }))))
        })
        .collect();
    ObjectLit {
        span: DUMMY_SP,
        props,
    }
}

pub(crate) fn prop_name(key: &str) -> PropName {
    if is_identifier_name(key) {
        PropName::Ident(IdentName::new(key.into(), DUMMY_SP))
    } else {
        PropName::Str(Str::from(key))
    }
}

/// Whether `name` can be written as a property name after `.` or as an
/// unquoted object key.
pub(crate) fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => Ident::is_valid_start(first) && chars.all(Ident::is_valid_continue),
        None => false,
    }
}

/// Whether `name` can be referenced as a variable: an identifier name that
/// is not a reserved word.
pub(crate) fn is_binding_identifier(name: &str) -> bool {
    Ident::verify_symbol(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn object(entries: Vec<(&str, DocValue)>) -> DocValue {
        DocValue::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    fn object_keys(expr: &Expr) -> Vec<String> {
        let Expr::Object(object) = expr else {
            panic!("expected object literal, got {expr:?}");
        };
        object
            .props
            .iter()
            .map(|prop| match prop {
                PropOrSpread::Prop(prop) => match prop.as_ref() {
                    Prop::KeyValue(kv) => match &kv.key {
                        PropName::Ident(ident) => ident.sym.to_string(),
                        PropName::Str(value) => value.value.to_string_lossy().into_owned(),
                        other => panic!("unexpected key {other:?}"),
                    },
                    other => panic!("unexpected prop {other:?}"),
                },
                other => panic!("unexpected spread {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_top_level_undefined_is_absent() {
        assert!(serialize(&DocValue::Undefined).is_none());
    }

    #[test]
    fn test_undefined_entries_are_dropped() {
        let value = object(vec![
            ("displayName", DocValue::Undefined),
            ("props", object(vec![])),
            ("description", "".into()),
        ]);
        let expr = serialize(&value).unwrap();
        assert_eq!(object_keys(&expr), vec!["props", "description"]);
        assert_eq!(
            evaluate(&expr),
            Some(object(vec![("props", object(vec![])), ("description", "".into())]))
        );
    }

    #[test]
    fn test_key_order_is_preserved() {
        let value = object(vec![
            ("z", DocValue::Null),
            ("a", DocValue::Bool(true)),
            ("m", DocValue::Number(1.0)),
        ]);
        assert_eq!(object_keys(&serialize(&value).unwrap()), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_non_identifier_keys_become_strings() {
        let value = object(vec![("aria-label", "x".into()), ("valid_key", "y".into())]);
        let Expr::Object(object) = serialize(&value).unwrap() else {
            panic!("expected object literal");
        };
        let keys: Vec<_> = object
            .props
            .iter()
            .map(|prop| match prop {
                PropOrSpread::Prop(prop) => match prop.as_ref() {
                    Prop::KeyValue(kv) => matches!(kv.key, PropName::Str(_)),
                    _ => unreachable!(),
                },
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(keys, vec![true, false]);
    }

    #[test]
    fn test_negative_numbers_use_unary_minus() {
        let expr = serialize(&DocValue::Number(-2.5)).unwrap();
        assert!(matches!(
            &expr,
            Expr::Unary(UnaryExpr {
                op: UnaryOp::Minus,
                ..
            })
        ));
        assert_eq!(evaluate(&expr), Some(DocValue::Number(-2.5)));
    }

    #[test]
    fn test_array_order_and_holes() {
        let value = DocValue::Array(vec![
            "first".into(),
            DocValue::Undefined,
            DocValue::Array(vec![DocValue::Null]),
        ]);
        let expr = serialize(&value).unwrap();
        let Expr::Array(array) = &expr else {
            panic!("expected array literal");
        };
        assert_eq!(array.elems.len(), 3);
        assert!(array.elems[1].is_none());
        assert_eq!(evaluate(&expr), Some(value));
    }

    #[test]
    fn test_nested_record_round_trips() {
        let record = serde_json::json!({
            "description": "Button with a label",
            "displayName": "Button",
            "methods": [],
            "props": {
                "label": {
                    "type": {"name": "string"},
                    "required": true,
                    "description": "",
                    "defaultValue": {"value": "'OK'", "computed": false}
                },
                "size": {"type": {"name": "enum", "value": [{"value": "1"}, {"value": "2"}]}, "required": false}
            },
            "extra": null,
            "weight": 0.5
        });
        let value = DocValue::from(record);
        let expr = serialize(&value).unwrap();
        assert_eq!(evaluate(&expr), Some(value));
    }

    #[test]
    fn test_identifier_names() {
        assert!(is_identifier_name("Foo"));
        assert!(is_identifier_name("_private$"));
        assert!(is_identifier_name("Überschrift"));
        assert!(is_identifier_name("default"));
        assert!(!is_identifier_name(""));
        assert!(!is_identifier_name("1abc"));
        assert!(!is_identifier_name("aria-label"));
        assert!(!is_identifier_name("Foo.Bar"));
    }

    #[test]
    fn test_binding_identifiers_reject_reserved_words() {
        assert!(is_binding_identifier("Foo"));
        assert!(is_binding_identifier("Überschrift"));
        assert!(is_binding_identifier("日本"));
        for reserved in ["class", "new", "default", "this", "null", "let", "yield"] {
            assert!(!is_binding_identifier(reserved), "{reserved}");
        }
        assert!(!is_binding_identifier(""));
        assert!(!is_binding_identifier("My Button"));
    }

    #[test]
    fn test_negative_zero_keeps_its_sign() {
        let expr = serialize(&DocValue::Number(-0.0)).unwrap();
        assert!(matches!(
            &expr,
            Expr::Unary(UnaryExpr {
                op: UnaryOp::Minus,
                ..
            })
        ));
        let Some(DocValue::Number(value)) = evaluate(&expr) else {
            panic!("expected a number");
        };
        assert!(value == 0.0 && value.is_sign_negative());
    }

    #[test]
    fn test_unicode_keys_stay_identifiers() {
        let value = object(vec![("größe", "x".into())]);
        let Expr::Object(object) = serialize(&value).unwrap() else {
            panic!("expected object literal");
        };
        let PropOrSpread::Prop(prop) = &object.props[0] else {
            panic!("expected property");
        };
        assert!(matches!(
            prop.as_ref(),
            Prop::KeyValue(KeyValueProp {
                key: PropName::Ident(_),
                ..
            })
        ));
    }
}
