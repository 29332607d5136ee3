//! Line-item grouping for the contract and the customs declaration
//!
//! Rows sharing a group key collapse into one line with summed quantities,
//! amounts and weights. Insertion order is preserved so the documents list
//! groups in first-appearance order.

use exportdoc_extractor::RawRow;

/// Identity of one aggregated line.
///
/// Two rows belong to the same line when display name, unit price and
/// variant all match. The contract leaves `variant` unset; the customs
/// declaration keys on the product model as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKey {
    pub display_name: String,
    pub unit_price: i64,
    pub variant: Option<String>,
}

/// Accumulated values of one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineAggregate {
    pub quantity: i64,
    pub amount: f64,
    pub net_weight: f64,
    pub gross_weight: f64,
    pub cartons: i64,
    /// Domestic source of the goods, from the first row of the group.
    pub origin: String,
    /// Contract reference, from the first row of the group.
    pub reference: String,
}

/// Insertion-ordered group table.
#[derive(Debug, Default)]
pub struct GroupMap {
    entries: Vec<(GroupKey, LineAggregate)>,
}

impl GroupMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, key: GroupKey, line: LineAggregate) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                existing.quantity += line.quantity;
                existing.amount += line.amount;
                existing.net_weight += line.net_weight;
                existing.gross_weight += line.gross_weight;
                existing.cartons += line.cartons;
            }
            None => self.entries.push((key, line)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(GroupKey, LineAggregate)> {
        self.entries.iter()
    }
}

pub(crate) fn field<'a>(row: &'a RawRow, name: &str) -> &'a str {
    row.get(name).map_or("", String::as_str)
}

pub(crate) fn int_field(row: &RawRow, name: &str) -> i64 {
    field(row, name).parse::<f64>().map_or(0, |v| v.trunc() as i64)
}

pub(crate) fn float_field(row: &RawRow, name: &str) -> f64 {
    field(row, name).parse().unwrap_or(0.0)
}

/// Group rows for the contract: one line per product name and unit price.
#[must_use]
pub fn group_for_contract(rows: &[RawRow]) -> GroupMap {
    let mut groups = GroupMap::new();
    for row in rows {
        let display_name = format!("{} {}", field(row, "英文品名"), field(row, "中文品名"));
        let key = GroupKey {
            display_name,
            unit_price: int_field(row, "单价"),
            variant: None,
        };
        groups.merge(
            key,
            LineAggregate {
                quantity: int_field(row, "数量"),
                amount: int_field(row, "总价") as f64,
                ..LineAggregate::default()
            },
        );
    }
    groups
}

/// Group rows for the customs declaration: one line per commodity code,
/// name, unit price and product model.
#[must_use]
pub fn group_for_customs(rows: &[RawRow]) -> GroupMap {
    let mut groups = GroupMap::new();
    for row in rows {
        let display_name = format!("{}{}", field(row, "HS CODE"), field(row, "中文品名"));
        let key = GroupKey {
            display_name,
            unit_price: int_field(row, "单价"),
            variant: Some(field(row, "产品型号").to_string()),
        };
        groups.merge(
            key,
            LineAggregate {
                quantity: int_field(row, "数量"),
                amount: int_field(row, "总价") as f64,
                net_weight: float_field(row, "净重"),
                gross_weight: float_field(row, "毛重"),
                cartons: int_field(row, "箱数"),
                origin: field(row, "发货地").to_string(),
                reference: field(row, "合同号码").to_string(),
            },
        );
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn test_contract_grouping_sums_same_product() {
        let rows = vec![
            row(&[("英文品名", "Widget"), ("单价", "10"), ("数量", "1"), ("总价", "10")]),
            row(&[("英文品名", "Widget"), ("单价", "10"), ("数量", "2"), ("总价", "20")]),
            row(&[("英文品名", "Widget"), ("单价", "10"), ("数量", "3"), ("总价", "30")]),
        ];
        let groups = group_for_contract(&rows);
        assert_eq!(groups.len(), 1);
        let (key, line) = groups.iter().next().unwrap();
        assert_eq!(key.display_name, "Widget ");
        assert_eq!(line.quantity, 6);
        assert_eq!(line.amount, 60.0);
    }

    #[test]
    fn test_contract_grouping_splits_on_price() {
        let rows = vec![
            row(&[("英文品名", "Widget"), ("单价", "10"), ("数量", "1")]),
            row(&[("英文品名", "Widget"), ("单价", "12"), ("数量", "1")]),
        ];
        let groups = group_for_contract(&rows);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_customs_grouping_splits_on_variant() {
        let rows = vec![
            row(&[("中文品名", "桌布"), ("单价", "10"), ("产品型号", "A")]),
            row(&[("中文品名", "桌布"), ("单价", "10"), ("产品型号", "B")]),
            row(&[("中文品名", "桌布"), ("单价", "10"), ("产品型号", "A")]),
        ];
        let groups = group_for_customs(&rows);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_customs_grouping_carries_origin_and_reference() {
        let rows = vec![row(&[
            ("中文品名", "桌布"),
            ("发货地", "杭州"),
            ("合同号码", "HT-2024-001"),
            ("箱数", "5"),
            ("净重", "1.5"),
            ("毛重", "2.0"),
        ])];
        let groups = group_for_customs(&rows);
        let (_, line) = groups.iter().next().unwrap();
        assert_eq!(line.origin, "杭州");
        assert_eq!(line.reference, "HT-2024-001");
        assert_eq!(line.cartons, 5);
        assert_eq!(line.net_weight, 1.5);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let rows = vec![
            row(&[("英文品名", "B"), ("单价", "1")]),
            row(&[("英文品名", "A"), ("单价", "1")]),
            row(&[("英文品名", "B"), ("单价", "1")]),
        ];
        let groups = group_for_contract(&rows);
        let names: Vec<_> = groups.iter().map(|(k, _)| k.display_name.clone()).collect();
        assert_eq!(names, vec!["B ", "A "]);
    }
}
