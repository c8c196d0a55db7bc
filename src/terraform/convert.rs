//! Conversion from parsed HCL into the crate's value model.

use std::path::Path;

use hcl::eval::{Context, Evaluate};
use hcl::expr::{Expression, ObjectKey, TemplateExpr, Traversal, TraversalOperator};
use hcl::template::{Element, Template};
use hcl::{Block, BlockLabel, Body};

use crate::record::{Metadata, Record};
use crate::value::{Reference, Scalar, Value};

/// Converts a top-level block into its block-type key and an addressed record.
///
/// `resource` blocks are keyed by their resource type and addressed as
/// `<type>.<name>`; every other block is keyed by its identifier and
/// addressed by the identifier followed by its labels.
pub fn block(block: &Block, file: &Path) -> (String, Record) {
    let identifier = block.identifier();
    let labels: Vec<&str> = block.labels().iter().map(BlockLabel::as_str).collect();

    let (block_type, path) = match (identifier, labels.as_slice()) {
        ("resource", [kind, ..]) => (kind.to_string(), labels.join(".")),
        _ => {
            let mut parts = vec![identifier];
            parts.extend(labels.iter().copied());
            (identifier.to_string(), parts.join("."))
        }
    };

    let mut meta = Metadata::new(path).with_file(file);
    if let Some(label) = labels.last() {
        meta = meta.with_label(*label);
    }

    (block_type, body(block.body()).with_meta(meta))
}

/// Converts a block body. Repeated nested blocks become a sequence, a
/// single nested block a record.
pub fn body(body: &Body) -> Record {
    let mut record = Record::new();

    for attribute in body.attributes() {
        record.insert(attribute.key(), expression(attribute.expr()));
    }

    let mut nested: Vec<(&str, Vec<Record>)> = Vec::new();
    for child in body.blocks() {
        if !child.labels().is_empty() {
            tracing::warn!(block = child.identifier(), "nested block labels ignored");
        }
        let converted = self::body(child.body());
        match nested.iter_mut().find(|(id, _)| *id == child.identifier()) {
            Some((_, records)) => records.push(converted),
            None => nested.push((child.identifier(), vec![converted])),
        }
    }

    for (identifier, mut records) in nested {
        let value = if records.len() == 1 {
            Value::Record(records.remove(0))
        } else {
            Value::from(records)
        };
        if record.insert(identifier, value).is_some() {
            tracing::warn!(key = identifier, "nested block replaces attribute of the same name");
        }
    }

    record
}

pub fn expression(expr: &Expression) -> Value {
    match expr {
        Expression::Null => Value::null(),
        Expression::Bool(b) => Value::from(*b),
        Expression::Number(n) => Value::Scalar(number(n)),
        Expression::String(s) => Value::from(s.as_str()),
        Expression::Array(items) => array(items),
        Expression::Object(object) => {
            let mut record = Record::new();
            for (key, value) in object.iter() {
                record.insert(object_key(key), expression(value));
            }
            Value::Record(record)
        }
        Expression::Variable(variable) => Value::from(Reference::attribute(variable.as_str())),
        Expression::Traversal(traversal) => match reference_path(traversal) {
            Some(path) => Value::from(Reference::Attribute(path)),
            None => evaluate(expr),
        },
        Expression::TemplateExpr(template) => match interpolated_reference(template) {
            Some(reference) => Value::from(reference),
            None => evaluate(expr),
        },
        _ => evaluate(expr),
    }
}

fn array(items: &[Expression]) -> Value {
    let values: Vec<Value> = items.iter().map(expression).collect();

    let paths: Option<Vec<String>> = values
        .iter()
        .map(|value| match value {
            Value::Reference(Reference::Attribute(path)) => Some(path.clone()),
            _ => None,
        })
        .collect();

    match paths {
        Some(paths) if !paths.is_empty() => Value::from(Reference::Attributes(paths)),
        _ => Value::Sequence(values),
    }
}

/// A template made of a single interpolation, e.g. `"${aws_instance.web.id}"`,
/// is the same reference as the bare traversal.
fn interpolated_reference(template: &TemplateExpr) -> Option<Reference> {
    let parsed = Template::from_expr(template).ok()?;
    let [Element::Interpolation(interpolation)] = parsed.elements() else {
        return None;
    };

    match &interpolation.expr {
        Expression::Variable(variable) => Some(Reference::attribute(variable.as_str())),
        Expression::Traversal(traversal) => reference_path(traversal).map(Reference::Attribute),
        _ => None,
    }
}

/// Renders a traversal rooted at a variable in Terraform syntax, e.g.
/// `aws_instance.hextris-server.public_ip` or `aws_instance.web[0].id`.
fn reference_path(traversal: &Traversal) -> Option<String> {
    let Expression::Variable(root) = &traversal.expr else {
        return None;
    };

    let mut path = root.as_str().to_string();
    for operator in &traversal.operators {
        match operator {
            TraversalOperator::GetAttr(ident) => {
                path.push('.');
                path.push_str(ident.as_str());
            }
            TraversalOperator::Index(Expression::Number(n)) => {
                path.push_str(&format!("[{n}]"));
            }
            TraversalOperator::Index(Expression::String(s)) => {
                path.push_str(&format!("[{s:?}]"));
            }
            TraversalOperator::LegacyIndex(n) => path.push_str(&format!(".{n}")),
            TraversalOperator::AttrSplat => path.push_str(".*"),
            TraversalOperator::FullSplat => path.push_str("[*]"),
            _ => return None,
        }
    }
    Some(path)
}

fn object_key(key: &ObjectKey) -> String {
    match key {
        ObjectKey::Identifier(ident) => ident.as_str().to_string(),
        ObjectKey::Expression(Expression::String(s)) => s.clone(),
        ObjectKey::Expression(expr) => source_text(expr),
        #[allow(unreachable_patterns)]
        _ => String::new(),
    }
}

fn number(n: &hcl::Number) -> Scalar {
    n.as_i64()
        .map(Scalar::Integer)
        .or_else(|| n.as_f64().map(Scalar::Float))
        .unwrap_or(Scalar::Null)
}

// NOTE: Templates and heredocs resolve here. Anything that needs variables
// or functions is kept as source text.
fn evaluate(expr: &Expression) -> Value {
    let ctx = Context::new();
    match expr.evaluate(&ctx) {
        Ok(value) => from_hcl_value(value),
        Err(err) => {
            let text = source_text(expr);
            tracing::warn!(expression = %text, error = %err, "expression kept unevaluated");
            Value::from(text)
        }
    }
}

fn from_hcl_value(value: hcl::Value) -> Value {
    match value {
        hcl::Value::Null => Value::null(),
        hcl::Value::Bool(b) => Value::from(b),
        hcl::Value::Number(n) => Value::Scalar(number(&n)),
        hcl::Value::String(s) => Value::from(s),
        hcl::Value::Array(items) => Value::Sequence(items.into_iter().map(from_hcl_value).collect()),
        hcl::Value::Object(object) => {
            let mut record = Record::new();
            for (key, value) in object {
                record.insert(key, from_hcl_value(value));
            }
            Value::Record(record)
        }
        #[allow(unreachable_patterns)]
        _ => Value::null(),
    }
}

// Templates keep their raw text without the surrounding quotes.
fn source_text(expr: &Expression) -> String {
    match expr {
        Expression::TemplateExpr(template) => template.to_string(),
        _ => hcl::format::to_string(expr).unwrap_or_default(),
    }
}
