// Collection query engine - selection, sorting, grouping by attribute

use crate::data::Value;
use crate::record::Record;

/// Positional gather. Panics if an index is out of range, matching plain
/// sequence indexing.
pub fn select_by_index(records: &[Record], idxs: &[usize]) -> Vec<Record> {
    idxs.iter().map(|&i| records[i].clone()).collect()
}

/// Keep records that declare `attr` and whose stored value is defined.
/// Schema defaults are excluded - only explicit values count. Input
/// order is preserved.
pub fn select_by_attr_defined(records: &[Record], attr: &str) -> Vec<Record> {
    records
        .iter()
        .filter(|record| explicit_value(record, attr).is_some())
        .cloned()
        .collect()
}

/// `select_by_attr_defined` further filtered by exact equality to
/// `value`.
pub fn select_by_attr_value(records: &[Record], attr: &str, value: &Value) -> Vec<Record> {
    records
        .iter()
        .filter(|record| explicit_value(record, attr).as_ref() == Some(value))
        .cloned()
        .collect()
}

/// Iteratively apply `select_by_attr_value` for each `(attr, value)`
/// pair, each pass filtering the previous pass's output - a logical AND
/// across all pairs. Pair order never changes the final set, only how
/// fast the candidate set shrinks.
pub fn select_by_attrs_values(records: &[Record], pairs: &[(String, Value)]) -> Vec<Record> {
    let mut selected = records.to_vec();
    for (attr, value) in pairs {
        selected = select_by_attr_value(&selected, attr, value);
    }
    selected
}

/// Project one attribute's resolved value across all records, in order.
/// A record that does not declare `attr` yields the default (the
/// absent-marker when none is given) rather than erroring.
pub fn values_for_attr(records: &[Record], attr: &str, default: Option<&Value>) -> Vec<Value> {
    records
        .iter()
        .map(|record| match record.get_with(attr, default, true) {
            Ok(value) => value,
            Err(_) => default.cloned().unwrap_or(Value::Absent),
        })
        .collect()
}

/// Stable sort by the natural ordering of each record's resolved value
/// for `attr`. An input of length one, or with no defined value for the
/// attribute anywhere, is returned unchanged rather than sorted.
pub fn sort_by_attr(records: &[Record], attr: &str) -> Vec<Record> {
    if records.len() <= 1 {
        return records.to_vec();
    }
    let keys = values_for_attr(records, attr, None);
    if keys.iter().all(|key| !key.is_defined()) {
        return records.to_vec();
    }
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| keys[a].natural_cmp(&keys[b]));
    order.into_iter().map(|i| records[i].clone()).collect()
}

/// Partition into one group per distinct defined value of `attr`.
/// Records whose attribute resolves absent are dropped from all groups;
/// groups come out in first-seen order and keep each record's original
/// relative position.
pub fn group_by_attr(records: &[Record], attr: &str) -> Vec<Vec<Record>> {
    let mut keys: Vec<Value> = Vec::new();
    let mut groups: Vec<Vec<Record>> = Vec::new();
    for record in records {
        let value = match record.get_with(attr, None, true) {
            Ok(value) if value.is_defined() => value,
            _ => continue,
        };
        // Value is only PartialEq, so the key probe is a linear scan.
        match keys.iter().position(|key| *key == value) {
            Some(i) => groups[i].push(record.clone()),
            None => {
                keys.push(value);
                groups.push(vec![record.clone()]);
            }
        }
    }
    groups
}

fn explicit_value(record: &Record, attr: &str) -> Option<Value> {
    match record.get_explicit(attr) {
        Ok(value) if value.is_defined() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Vlist;

    fn part(name: &str, size: f64) -> Record {
        Record::construct(
            "Part",
            &["name=str".into(), "size=num".into(), "grade=str=b".into()],
            Vlist::pairs(vec![
                ("name", Value::Str(name.to_string())),
                ("size", Value::Num(size)),
            ]),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_select_by_index_gathers() {
        let records = vec![part("a", 1.0), part("b", 2.0), part("c", 3.0)];
        let picked = select_by_index(&records, &[2, 0]);
        assert_eq!(picked[0].get("name").unwrap(), Value::Str("c".to_string()));
        assert_eq!(picked[1].get("name").unwrap(), Value::Str("a".to_string()));
    }

    #[test]
    fn test_defined_excludes_schema_defaults() {
        let records = vec![part("a", 1.0)];
        // "grade" resolves to its schema default on get, but was never set
        assert_eq!(
            records[0].get("grade").unwrap(),
            Value::Str("b".to_string())
        );
        assert!(select_by_attr_defined(&records, "grade").is_empty());
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let records = vec![part("x", 2.0), part("y", 1.0), part("z", 2.0)];
        let sorted = sort_by_attr(&records, "size");
        let names: Vec<Value> = values_for_attr(&sorted, "name", None);
        assert_eq!(
            names,
            vec![
                Value::Str("y".to_string()),
                Value::Str("x".to_string()),
                Value::Str("z".to_string()),
            ]
        );
    }

    #[test]
    fn test_sort_without_defined_keys_is_identity() {
        let records = vec![part("b", 2.0), part("a", 1.0)];
        let sorted = sort_by_attr(&records, "missing");
        assert_eq!(sorted, records);
    }

    #[test]
    fn test_group_drops_undefined() {
        let ungraded = part("a", 1.0);
        let graded = ungraded.set("grade", Value::Str("a".to_string())).unwrap();
        // grouping resolves through schema defaults, so even the unset
        // record lands in the default-grade group
        let groups = group_by_attr(&[ungraded.clone(), graded.clone()], "grade");
        assert_eq!(groups.len(), 2);

        let no_such = group_by_attr(&[ungraded, graded], "missing");
        assert!(no_such.is_empty());
    }
}
