//! Profession-or-tool line item rules
//!
//! Order products and basket items share the same shape: exactly one of
//! `professionId` / `toolId`, and tool items carry no level or time fields.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TimeUnit {
    Hourly,
    Daily,
}

/// Largest quantity a single order product or basket item may ask for
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

pub const MSG_BOTH_TARGETS: &str =
    "Only one of professionId or toolId can be provided per order product.";
pub const MSG_NO_TARGET: &str =
    "Either professionId or toolId must be provided for each order product.";
pub const MSG_TOOL_EXTRAS: &str =
    "LevelId, timeUnit, and workingTime cannot be provided for tools.";

/// What a valid line item points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTarget {
    Profession(i64),
    Tool(i64),
}

/// Accessors needed to check a line item
pub trait LineItem {
    fn profession_id(&self) -> Option<i64>;
    fn tool_id(&self) -> Option<i64>;
    fn level_id(&self) -> Option<i64>;
    fn time_unit(&self) -> Option<TimeUnit>;
    fn working_time(&self) -> Option<i64>;

    /// Check the xor and tool-extras rules, returning the target
    fn target(&self) -> Result<LineTarget, &'static str> {
        match (self.profession_id(), self.tool_id()) {
            (Some(_), Some(_)) => Err(MSG_BOTH_TARGETS),
            (None, None) => Err(MSG_NO_TARGET),
            (Some(profession_id), None) => Ok(LineTarget::Profession(profession_id)),
            (None, Some(tool_id)) => {
                if self.level_id().is_some()
                    || self.time_unit().is_some()
                    || self.working_time().is_some()
                {
                    Err(MSG_TOOL_EXTRAS)
                } else {
                    Ok(LineTarget::Tool(tool_id))
                }
            }
        }
    }
}

/// Referenced catalog ids collected from a batch of line items
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineRefs {
    pub profession_ids: Vec<i64>,
    pub tool_ids: Vec<i64>,
    pub level_ids: Vec<i64>,
}

impl LineRefs {
    /// Deduplicated, sorted id sets
    pub fn collect<'a, T: LineItem + 'a>(items: impl IntoIterator<Item = &'a T>) -> Self {
        let mut refs = Self::default();
        for item in items {
            refs.profession_ids.extend(item.profession_id());
            refs.tool_ids.extend(item.tool_id());
            refs.level_ids.extend(item.level_id());
        }
        for ids in [
            &mut refs.profession_ids,
            &mut refs.tool_ids,
            &mut refs.level_ids,
        ] {
            ids.sort_unstable();
            ids.dedup();
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        profession_id: Option<i64>,
        tool_id: Option<i64>,
        level_id: Option<i64>,
        time_unit: Option<TimeUnit>,
        working_time: Option<i64>,
    }

    impl LineItem for Item {
        fn profession_id(&self) -> Option<i64> {
            self.profession_id
        }
        fn tool_id(&self) -> Option<i64> {
            self.tool_id
        }
        fn level_id(&self) -> Option<i64> {
            self.level_id
        }
        fn time_unit(&self) -> Option<TimeUnit> {
            self.time_unit
        }
        fn working_time(&self) -> Option<i64> {
            self.working_time
        }
    }

    fn item(profession_id: Option<i64>, tool_id: Option<i64>) -> Item {
        Item {
            profession_id,
            tool_id,
            level_id: None,
            time_unit: None,
            working_time: None,
        }
    }

    #[test]
    fn test_xor_rule() {
        assert_eq!(item(Some(1), Some(2)).target(), Err(MSG_BOTH_TARGETS));
        assert_eq!(item(None, None).target(), Err(MSG_NO_TARGET));
        assert_eq!(item(Some(1), None).target(), Ok(LineTarget::Profession(1)));
        assert_eq!(item(None, Some(2)).target(), Ok(LineTarget::Tool(2)));
    }

    #[test]
    fn test_tool_rejects_profession_fields() {
        let mut with_level = item(None, Some(2));
        with_level.level_id = Some(3);
        assert_eq!(with_level.target(), Err(MSG_TOOL_EXTRAS));

        let mut with_unit = item(None, Some(2));
        with_unit.time_unit = Some(TimeUnit::Daily);
        assert_eq!(with_unit.target(), Err(MSG_TOOL_EXTRAS));

        let mut with_time = item(None, Some(2));
        with_time.working_time = Some(4);
        assert_eq!(with_time.target(), Err(MSG_TOOL_EXTRAS));

        let mut profession = item(Some(1), None);
        profession.level_id = Some(3);
        profession.time_unit = Some(TimeUnit::Hourly);
        profession.working_time = Some(8);
        assert!(profession.target().is_ok());
    }

    #[test]
    fn test_refs_are_deduplicated() {
        let mut a = item(Some(5), None);
        a.level_id = Some(2);
        let mut b = item(Some(5), None);
        b.level_id = Some(1);
        let c = item(None, Some(9));
        let refs = LineRefs::collect([&a, &b, &c]);
        assert_eq!(refs.profession_ids, vec![5]);
        assert_eq!(refs.level_ids, vec![1, 2]);
        assert_eq!(refs.tool_ids, vec![9]);
    }
}
