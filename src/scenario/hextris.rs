//! Expectations for the Hextris deployment in `infra/`.

use super::{Scenario, Selector};
use crate::record::Record;
use crate::value::Reference;

pub const SECURITY_GROUP_PATH: &str = "aws_security_group.hextris-server";
pub const INSTANCE_PATH: &str = "aws_instance.hextris-server";
pub const OUTPUT_PATH: &str = "output.hextris-url";

/// Boot script that serves the game from Apache.
pub const USER_DATA: &str = "#!/bin/bash
yum install -y httpd
systemctl enable httpd
systemctl start httpd

yum install -y git
cd /var/www/html
git clone https://github.com/Hextris/hextris .
";

const ANYWHERE: &str = "0.0.0.0/0";

fn rule(from_port: i64, to_port: i64) -> Record {
    Record::new()
        .with("from_port", from_port)
        .with("to_port", to_port)
        .with("cidr_blocks", vec![ANYWHERE])
}

pub fn required_providers() -> Record {
    Record::new().with(
        "required_providers",
        Record::new().with(
            "aws",
            Record::new()
                .with("source", "hashicorp/aws")
                .with("version", "~> 5.0"),
        ),
    )
}

pub fn provider() -> Record {
    Record::new()
        .with("region", "us-east-1")
        .with("shared_credentials_files", vec!["./credentials"])
}

pub fn security_group() -> Record {
    Record::new()
        .with("name", "hextris-server")
        .with("description", "Hextris HTTP and SSH access")
        .with("ingress", vec![rule(80, 80), rule(22, 22)])
        .with("egress", rule(0, 0))
}

pub fn instance() -> Record {
    Record::new()
        .with("ami", "ami-0e731c8a588258d0d")
        .with("instance_type", "t2.micro")
        .with("user_data", USER_DATA)
        .with(
            "security_groups",
            Reference::attributes([format!("{SECURITY_GROUP_PATH}.name")]),
        )
        .with("tags", Record::new().with("Name", "hextris"))
}

pub fn output() -> Record {
    Record::new().with(
        "value",
        Reference::attribute(format!("{INSTANCE_PATH}.public_ip")),
    )
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "required_providers",
            "terraform",
            Selector::First,
            required_providers(),
        ),
        Scenario::new("provider", "provider", Selector::Sole, provider()).with_label("aws"),
        Scenario::new(
            "security_group",
            "aws_security_group",
            Selector::path(SECURITY_GROUP_PATH),
            security_group(),
        ),
        Scenario::new(
            "instance",
            "aws_instance",
            Selector::path(INSTANCE_PATH),
            instance(),
        ),
        Scenario::new("output", "output", Selector::path(OUTPUT_PATH), output()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_scenario_names_are_unique() {
        let scenarios = scenarios();
        let mut names: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), scenarios.len());
    }

    #[test]
    fn test_ingress_rules_are_ordered() {
        let ingress = security_group();
        let rules = ingress.get("ingress").and_then(Value::as_sequence).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules[0].as_record().and_then(|r| r.get("from_port")),
            Some(&Value::from(80))
        );
        assert_eq!(
            rules[1].as_record().and_then(|r| r.get("from_port")),
            Some(&Value::from(22))
        );
    }

    #[test]
    fn test_instance_security_groups_is_reference() {
        let instance = instance();
        assert_eq!(
            instance.get("security_groups").and_then(Value::as_reference),
            Some(&Reference::attributes([
                "aws_security_group.hextris-server.name"
            ]))
        );
    }
}
