//! Attribute edits given on the command line, e.g. `set Vitality 20`.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use attribute_core::{CharacterAttributes, TemplateOracle};

/// What an edit does to its attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EditOp {
    /// Set the base value (forces propagation).
    Set,
    /// Add to the base value.
    Add,
    /// Add a flat modifier outside the formula system.
    Modifier,
    /// Set a resource's current value.
    Current,
    /// Subtract from a resource's current value.
    Drain,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub op: EditOp,
    pub attribute: String,
    pub amount: i32,
}

impl FromStr for Edit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [op, attribute, amount] = parts.as_slice() else {
            bail!("expected `<op> <attribute> <amount>`, got '{}'", s);
        };
        let op: EditOp = op
            .parse()
            .map_err(|_| anyhow!("unknown edit '{}' (set, add, modifier, current, drain)", op))?;
        let amount: i32 = amount
            .parse()
            .with_context(|| format!("invalid amount '{}'", amount))?;

        Ok(Self {
            op,
            attribute: (*attribute).to_owned(),
            amount,
        })
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.op, self.attribute, self.amount)
    }
}

impl Edit {
    pub fn apply<O>(&self, registry: &O, sheet: &mut CharacterAttributes) -> Result<()>
    where
        O: TemplateOracle + ?Sized,
    {
        let template = registry.resolve_name(&self.attribute)?.id();
        let result = match self.op {
            EditOp::Set => sheet.set_value(template, self.amount),
            EditOp::Add => sheet.add_value(template, self.amount),
            EditOp::Modifier => sheet.add_modifier(template, self.amount),
            EditOp::Current => sheet.set_current(template, self.amount),
            EditOp::Drain => sheet.add_current(template, self.amount.saturating_neg()),
        };
        result.with_context(|| format!("edit '{}' failed", self))
    }
}

#[cfg(test)]
mod tests {
    use attribute_core::{
        AttributeBlueprint, AttributeTemplate, BlueprintEntry, FormulaSource, GraphConfig,
        LinearFormula, TemplateId, TemplateRegistry,
    };

    use super::*;

    #[test]
    fn parses_edits() {
        let edit: Edit = "set Vitality 20".parse().unwrap();
        assert_eq!(
            edit,
            Edit {
                op: EditOp::Set,
                attribute: "Vitality".into(),
                amount: 20,
            }
        );
        assert_eq!("DRAIN Health 5".parse::<Edit>().unwrap().op, EditOp::Drain);
        assert_eq!(edit.to_string(), "set Vitality 20");

        assert!("set Vitality".parse::<Edit>().is_err());
        assert!("heal Health 5".parse::<Edit>().is_err());
        assert!("add Vitality lots".parse::<Edit>().is_err());
    }

    #[test]
    fn applies_edits_by_name() {
        let registry = TemplateRegistry::new()
            .with(AttributeTemplate::builder(TemplateId(1), "Vitality").build())
            .unwrap()
            .with(
                AttributeTemplate::builder(TemplateId(2), "Health")
                    .resource()
                    .formula(TemplateId(1), LinearFormula::scale(FormulaSource::Final, 5))
                    .build(),
            )
            .unwrap();
        let blueprint = AttributeBlueprint::new(vec![
            BlueprintEntry::new(TemplateId(1), 10),
            BlueprintEntry::new(TemplateId(2), 0),
        ]);
        let mut sheet =
            CharacterAttributes::from_blueprint(&registry, &blueprint, GraphConfig::default())
                .unwrap();

        for edit in ["add Vitality 2", "drain Health 15"] {
            edit.parse::<Edit>()
                .unwrap()
                .apply(&registry, &mut sheet)
                .unwrap();
        }
        let health = sheet.try_get_attribute(TemplateId(2)).unwrap();
        assert_eq!(health.final_value(), 60);
        assert_eq!(health.current_value(), Some(35));

        let err = "current Vitality 3"
            .parse::<Edit>()
            .unwrap()
            .apply(&registry, &mut sheet)
            .unwrap_err();
        assert!(err.to_string().contains("current Vitality 3"));
    }
}
