use pretty_assertions::assert_eq;
use rstest::rstest;

use schema_diff::config::CompareConfig;
use schema_diff::schema::align::{align_columns, Position};
use schema_diff::schema::parser::parse_dump;
use schema_diff::schema::resolver::resolve_batch;
use schema_diff::schema::types::{Column, SchemaBatch};
use schema_diff::compare_schemas;

/// `CREATE TABLE` text the way `SHOW CREATE TABLE` prints it
fn table(name: &str, columns: &[&str], keys: &[&str], engine: &str) -> String {
    let mut lines: Vec<String> = columns
        .iter()
        .map(|column| format!("  `{}` int(11) NOT NULL", column))
        .collect();
    lines.extend(keys.iter().map(|key| format!("  {}", key)));

    format!(
        "CREATE TABLE `{}` (\n{}\n) ENGINE={} DEFAULT CHARSET=utf8;\n",
        name,
        lines.join(",\n"),
        engine
    )
}

fn batch(dump: &str) -> SchemaBatch {
    resolve_batch(parse_dump(dump).unwrap())
}

fn compare(source: &str, destination: &str) -> Vec<String> {
    compare_schemas(&batch(source), &batch(destination), &CompareConfig::default())
}

#[rstest]
#[case::drop_and_append(
    &["a", "b"],
    &["b", "c"],
    &[
        "ALTER TABLE `t` DROP COLUMN `a`",
        "ALTER TABLE `t` ADD COLUMN `c` int(11) NOT NULL AFTER `b`",
    ]
)]
#[case::swap(
    &["a", "b"],
    &["b", "a"],
    &["ALTER TABLE `t` MODIFY COLUMN `b` int(11) NOT NULL FIRST"]
)]
#[case::move_back(
    &["a", "b", "c"],
    &["a", "c", "b"],
    &["ALTER TABLE `t` MODIFY COLUMN `c` int(11) NOT NULL AFTER `a`"]
)]
#[case::interleaved_adds(
    &["a", "b"],
    &["a", "a1", "a2", "b", "b1"],
    &[
        "ALTER TABLE `t` ADD COLUMN `a1` int(11) NOT NULL AFTER `a`",
        "ALTER TABLE `t` ADD COLUMN `a2` int(11) NOT NULL AFTER `a1`",
        "ALTER TABLE `t` ADD COLUMN `b1` int(11) NOT NULL AFTER `b`",
    ]
)]
fn column_statements(#[case] old: &[&str], #[case] new: &[&str], #[case] expected: &[&str]) {
    let statements = compare(&table("t", old, &[], "InnoDB"), &table("t", new, &[], "InnoDB"));
    assert_eq!(statements, expected);
}

#[test]
fn changed_index_kind_is_dropped_then_added() {
    let source = table("t", &["x"], &["KEY `idx1` (`x`)"], "InnoDB");
    let destination = table("t", &["x"], &["UNIQUE KEY `idx1` (`x`)"], "InnoDB");

    assert_eq!(
        compare(&source, &destination),
        vec![
            "ALTER TABLE `t` DROP KEY `idx1`",
            "ALTER TABLE `t` ADD UNIQUE KEY `idx1` (`x`)",
        ]
    );
}

#[test]
fn comparing_a_schema_with_itself_is_empty() {
    let dump = [
        table("users", &["id", "age"], &["PRIMARY KEY (`id`)", "KEY `idx_age` (`age`)"], "InnoDB"),
        table("log", &["id"], &[], "MRG_MyISAM UNION=(`log_0`,`log_1`)"),
        table("log_0", &["id"], &[], "MyISAM"),
        table("log_1", &["id"], &[], "MyISAM"),
        "CREATE TABLE `users_copy` LIKE `users`;\n".to_string(),
    ]
    .concat();

    assert!(compare(&dump, &dump).is_empty());
}

/// Apply the column changes to the old column order the way MySQL would
fn replay(old: &[&str], new: &[&str]) -> Vec<String> {
    let old: Vec<Column> = old.iter().map(|n| Column::new(n, "int")).collect();
    let new: Vec<Column> = new.iter().map(|n| Column::new(n, "int")).collect();
    let alignment = align_columns(&old, &new);

    let mut order: Vec<String> = old.iter().map(|c| c.name.clone()).collect();
    order.retain(|name| !alignment.drops.iter().any(|d| &d.name == name));

    for change in &alignment.changes {
        order.retain(|name| name != &change.item.name);
        let at = match &change.position {
            Position::First => 0,
            Position::After(previous) => {
                order.iter().position(|name| name == previous).unwrap() + 1
            }
        };
        order.insert(at, change.item.name.clone());
    }
    order
}

#[rstest]
#[case(&["a", "b"], &["b", "c"])]
#[case(&["a", "b"], &["b", "a"])]
#[case(&["a", "b", "c"], &["a", "c", "b"])]
#[case(&["a", "b"], &["a", "a1", "a2", "b", "b1"])]
#[case(&["a", "b", "c"], &["c", "b", "a"])]
#[case(&["a", "b", "c", "d"], &["b", "d", "a", "c"])]
#[case(&["a", "b", "c"], &["c", "x", "a"])]
#[case(&[], &["a", "b"])]
#[case(&["a", "b"], &[])]
fn replaying_changes_reproduces_destination_order(#[case] old: &[&str], #[case] new: &[&str]) {
    assert_eq!(replay(old, new), new);
}

#[test]
fn index_drops_come_before_column_drops() {
    let source = table("t", &["a", "b"], &["KEY `idx` (`b`)"], "InnoDB");
    let destination = table("t", &["a", "c"], &["KEY `idx` (`c`)"], "InnoDB");

    assert_eq!(
        compare(&source, &destination),
        vec![
            "ALTER TABLE `t` DROP KEY `idx`",
            "ALTER TABLE `t` DROP COLUMN `b`",
            "ALTER TABLE `t` ADD COLUMN `c` int(11) NOT NULL AFTER `a`",
            "ALTER TABLE `t` ADD KEY `idx` (`c`)",
        ]
    );
}

#[test]
fn merge_children_follow_each_statement() {
    let merge = "MRG_MyISAM UNION=(`c1`,`c2`)";
    let source = [
        table("m", &["id"], &[], merge),
        table("c1", &["id"], &[], "MyISAM"),
        table("c2", &["id"], &[], "MyISAM"),
    ]
    .concat();
    let destination = [
        table("m", &["id", "x"], &["KEY `idx_x` (`x`)"], merge),
        table("c1", &["id", "x"], &["KEY `idx_x` (`x`)"], "MyISAM"),
        table("c2", &["id", "x"], &["KEY `idx_x` (`x`)"], "MyISAM"),
    ]
    .concat();

    assert_eq!(
        compare(&source, &destination),
        vec![
            "ALTER TABLE `m` ADD COLUMN `x` int(11) NOT NULL AFTER `id`",
            "ALTER TABLE `c1` ADD COLUMN `x` int(11) NOT NULL AFTER `id`",
            "ALTER TABLE `c2` ADD COLUMN `x` int(11) NOT NULL AFTER `id`",
            "ALTER TABLE `m` ADD KEY `idx_x` (`x`)",
            "ALTER TABLE `c1` ADD KEY `idx_x` (`x`)",
            "ALTER TABLE `c2` ADD KEY `idx_x` (`x`)",
        ]
    );
}

#[test]
fn new_tables_are_created_and_missing_tables_dropped() {
    let source = table("old", &["id"], &[], "InnoDB");
    let destination = table("fresh", &["id"], &[], "InnoDB");

    assert_eq!(
        compare(&source, &destination),
        vec![
            "CREATE TABLE `fresh` (\n  `id` int(11) NOT NULL\n) ENGINE=InnoDB DEFAULT CHARSET=utf8",
            "DROP TABLE `old`",
        ]
    );
}

#[test]
fn table_removal_can_be_disabled() {
    let config = CompareConfig {
        allow_table_removal: false,
        ..CompareConfig::default()
    };
    let source = batch(&table("old", &["id"], &[], "InnoDB"));

    assert!(compare_schemas(&source, &SchemaBatch::default(), &config).is_empty());
}

#[test]
fn like_tables_are_compared_with_their_copied_structure() {
    let source = [
        table("t", &["id"], &[], "InnoDB"),
        "CREATE TABLE `t_copy` LIKE `t`;\n".to_string(),
    ]
    .concat();
    let destination = [
        table("t", &["id", "name"], &[], "InnoDB"),
        "CREATE TABLE `t_copy` LIKE `t`;\n".to_string(),
    ]
    .concat();

    assert_eq!(
        compare(&source, &destination),
        vec![
            "ALTER TABLE `t` ADD COLUMN `name` int(11) NOT NULL AFTER `id`",
            "ALTER TABLE `t_copy` ADD COLUMN `name` int(11) NOT NULL AFTER `id`",
        ]
    );
}

#[test]
fn engine_change_is_optional() {
    let source = batch(&table("t", &["id"], &[], "InnoDB"));
    let destination = batch(&table("t", &["id"], &[], "MyISAM"));

    assert_eq!(
        compare_schemas(&source, &destination, &CompareConfig::default()),
        vec!["ALTER TABLE `t` ENGINE=MyISAM"]
    );

    let config = CompareConfig {
        compare_engine: false,
        ..CompareConfig::default()
    };
    assert!(compare_schemas(&source, &destination, &config).is_empty());
}

#[test]
fn merge_children_follow_drops_and_recreated_indexes() {
    let merge = "MRG_MyISAM UNION=(`c1`,`c2`)";
    let before = |name: &str, engine: &str| table(name, &["id", "a"], &["KEY `idx` (`id`)"], engine);
    let after = |name: &str, engine: &str| table(name, &["id"], &["UNIQUE KEY `idx` (`id`)"], engine);
    let source = [before("m", merge), before("c1", "MyISAM"), before("c2", "MyISAM")].concat();
    let destination = [after("m", merge), after("c1", "MyISAM"), after("c2", "MyISAM")].concat();

    assert_eq!(
        compare(&source, &destination),
        vec![
            "ALTER TABLE `m` DROP KEY `idx`",
            "ALTER TABLE `c1` DROP KEY `idx`",
            "ALTER TABLE `c2` DROP KEY `idx`",
            "ALTER TABLE `m` DROP COLUMN `a`",
            "ALTER TABLE `c1` DROP COLUMN `a`",
            "ALTER TABLE `c2` DROP COLUMN `a`",
            "ALTER TABLE `m` ADD UNIQUE KEY `idx` (`id`)",
            "ALTER TABLE `c1` ADD UNIQUE KEY `idx` (`id`)",
            "ALTER TABLE `c2` ADD UNIQUE KEY `idx` (`id`)",
        ]
    );
}

#[test]
fn engine_options_are_not_replayed_to_children() {
    let children = [
        table("c1", &["id"], &[], "MyISAM"),
        table("c2", &["id"], &[], "MyISAM"),
    ]
    .concat();
    let source = [table("m", &["id"], &[], "MRG_MyISAM UNION=(`c1`,`c2`)"), children.clone()].concat();

    let reordered = [table("m", &["id"], &[], "MRG_MyISAM UNION=(`c2`,`c1`)"), children.clone()].concat();
    assert_eq!(
        compare(&source, &reordered),
        vec!["ALTER TABLE `m` UNION=(`c2`,`c1`)"]
    );

    let unmerged = [table("m", &["id"], &[], "MyISAM"), children].concat();
    assert_eq!(compare(&source, &unmerged), vec!["ALTER TABLE `m` ENGINE=MyISAM"]);
}

#[test]
fn child_of_a_dropped_merge_table_is_altered_directly() {
    let source = [
        table("m", &["id"], &[], "MRG_MyISAM UNION=(`c1`)"),
        table("c1", &["id"], &[], "MyISAM"),
    ]
    .concat();
    let destination = table("c1", &["id", "x"], &[], "MyISAM");

    assert_eq!(
        compare(&source, &destination),
        vec![
            "DROP TABLE `m`",
            "ALTER TABLE `c1` ADD COLUMN `x` int(11) NOT NULL AFTER `id`",
        ]
    );
}

#[test]
fn child_leaving_the_union_is_altered_directly() {
    let source = [
        table("m", &["id"], &[], "MRG_MyISAM UNION=(`c1`,`c2`)"),
        table("c1", &["id"], &[], "MyISAM"),
        table("c2", &["id"], &[], "MyISAM"),
    ]
    .concat();
    let destination = [
        table("m", &["id"], &[], "MRG_MyISAM UNION=(`c2`)"),
        table("c1", &["id", "y"], &[], "MyISAM"),
        table("c2", &["id"], &[], "MyISAM"),
    ]
    .concat();

    assert_eq!(
        compare(&source, &destination),
        vec![
            "ALTER TABLE `c1` ADD COLUMN `y` int(11) NOT NULL AFTER `id`",
            "ALTER TABLE `m` UNION=(`c2`)",
        ]
    );
}

#[test]
fn like_table_is_created_after_its_source() {
    let destination = [
        "CREATE TABLE `a` LIKE `b`;\n".to_string(),
        table("b", &["id"], &[], "InnoDB"),
    ]
    .concat();

    assert_eq!(
        compare("", &destination),
        vec![
            "CREATE TABLE `b` (\n  `id` int(11) NOT NULL\n) ENGINE=InnoDB DEFAULT CHARSET=utf8",
            "CREATE TABLE `a` LIKE `b`",
        ]
    );
}
