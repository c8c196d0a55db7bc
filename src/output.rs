//! Human and machine readable renderings of configurations and reports.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use termtree::Tree;

use crate::record::{Metadata, Record};
use crate::scenario::Report;
use crate::terraform::ConfigTree;
use crate::value::Value;

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Scenario")]
    scenario: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Detail")]
    detail: String,
}

pub fn render_report(report: &Report) -> String {
    let rows = report.outcomes.iter().map(|outcome| ReportRow {
        scenario: outcome.scenario.clone(),
        status: if outcome.passed() { "PASS" } else { "FAIL" },
        detail: match &outcome.result {
            Ok(()) => String::new(),
            Err(err) => err.to_string(),
        },
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!(
        "{table}\n{} passed, {} failed",
        report.passed(),
        report.failed()
    )
}

pub fn render_tree(root: &str, tree: &ConfigTree) -> String {
    let mut out = Tree::new(root.to_string());
    for (block_type, records) in tree.iter() {
        let mut group = Tree::new(block_type.to_string());
        for record in records {
            let label = record.path().unwrap_or(block_type).to_string();
            group.push(record_tree(label, record));
        }
        out.push(group);
    }
    out.to_string()
}

fn record_tree(label: String, record: &Record) -> Tree<String> {
    let mut node = Tree::new(label);
    for (key, value) in record.iter() {
        node.push(value_tree(key.to_string(), value));
    }
    node
}

fn value_tree(label: String, value: &Value) -> Tree<String> {
    match value {
        Value::Record(record) => record_tree(label, record),
        Value::Sequence(items) if items.iter().any(|v| v.as_record().is_some()) => {
            let mut node = Tree::new(label.clone());
            for (i, item) in items.iter().enumerate() {
                node.push(value_tree(format!("{label}[{i}]"), item));
            }
            node
        }
        other => Tree::new(format!("{label} = {other}")),
    }
}

#[derive(Serialize)]
struct BlockView<'a> {
    #[serde(flatten)]
    meta: Option<&'a Metadata>,
    body: &'a Record,
}

pub fn render_json(tree: &ConfigTree) -> serde_json::Result<String> {
    let view: std::collections::BTreeMap<&str, Vec<BlockView<'_>>> = tree
        .iter()
        .map(|(block_type, records)| {
            let blocks = records
                .iter()
                .map(|record| BlockView {
                    meta: record.meta(),
                    body: record,
                })
                .collect();
            (block_type, blocks)
        })
        .collect();
    serde_json::to_string_pretty(&view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchError;
    use crate::scenario::Outcome;
    use crate::value::Reference;

    fn sample_tree() -> ConfigTree {
        let mut tree = ConfigTree::new();
        tree.push(
            "output",
            Record::new()
                .with_meta(Metadata::new("output.hextris-url").with_label("hextris-url"))
                .with(
                    "value",
                    Reference::attribute("aws_instance.hextris-server.public_ip"),
                ),
        );
        tree.push(
            "aws_security_group",
            Record::new()
                .with_meta(Metadata::new("aws_security_group.hextris-server"))
                .with(
                    "ingress",
                    vec![
                        Record::new().with("from_port", 80),
                        Record::new().with("from_port", 22),
                    ],
                ),
        );
        tree
    }

    #[test]
    fn test_render_report_lists_failures() {
        let report = Report {
            outcomes: vec![
                Outcome {
                    scenario: "provider".to_string(),
                    result: Ok(()),
                },
                Outcome {
                    scenario: "output".to_string(),
                    result: Err(MatchError::ResourceNotFound {
                        path: "output.hextris-url".to_string(),
                    }),
                },
            ],
        };

        let rendered = render_report(&report);
        assert!(rendered.contains("Scenario"));
        assert!(rendered.contains("PASS"));
        assert!(rendered.contains("FAIL"));
        assert!(rendered.contains("no resource named output.hextris-url"));
        assert!(rendered.ends_with("1 passed, 1 failed"));
    }

    #[test]
    fn test_render_tree_shows_paths_and_fields() {
        let rendered = render_tree("infra", &sample_tree());
        assert!(rendered.starts_with("infra"));
        assert!(rendered.contains("aws_security_group.hextris-server"));
        assert!(rendered.contains("ingress[1]"));
        assert!(rendered.contains("from_port = 22"));
        assert!(rendered.contains("value = ref(aws_instance.hextris-server.public_ip)"));
    }

    #[test]
    fn test_render_json_includes_metadata() {
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&sample_tree()).unwrap()).unwrap();

        let output = &json["output"][0];
        assert_eq!(output["path"], "output.hextris-url");
        assert_eq!(output["label"], "hextris-url");
        assert_eq!(
            output["body"]["value"]["attribute"],
            "aws_instance.hextris-server.public_ip"
        );
        assert_eq!(
            json["aws_security_group"][0]["body"]["ingress"][1]["from_port"],
            22
        );
    }
}
