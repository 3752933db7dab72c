use super::*;
use crate::column::Column;
use crate::constraint::{ColumnConstraint, TableConstraint};
use crate::fragment::raw_sql;

#[test]
fn test_simple_select() {
    let sql = Select::new().from_table("questions").build().unwrap();
    assert_eq!(sql, "SELECT * FROM `questions`");
}

#[test]
fn test_select_clause_order() {
    // Deliberately configured out of SQL order.
    let sql = Select::new()
        .limit(10)
        .offset(5)
        .order_by_desc("total")
        .having("count(*) > 1")
        .group_by("q.id")
        .where_("q.position > 0")
        .join(Join::left("answers").alias("a").on("a.question = q.id"))
        .from_table_as("questions", "q")
        .column("q.id")
        .column_as(raw_sql("count(*)"), "total")
        .distinct()
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT DISTINCT `q`.`id`, count(*) AS `total` FROM `questions` AS `q` \
         LEFT JOIN `answers` AS `a` ON a.question = q.id WHERE q.position > 0 \
         GROUP BY `q`.`id` HAVING count(*) > 1 ORDER BY `total` DESC LIMIT 10 OFFSET 5"
    );
}

#[test]
fn test_select_offset_requires_limit() {
    let err = Select::new()
        .from_table("t")
        .offset(3)
        .build()
        .unwrap_err();
    assert!(err.is_contract_violation());

    let sql = Select::new().from_table("t").limit(1).offset(3).build().unwrap();
    assert_eq!(sql, "SELECT * FROM `t` LIMIT 1 OFFSET 3");
}

#[test]
fn test_select_values_are_quoted_as_literals() {
    let sql = Select::new().value("it's").value_as(1, "one").build().unwrap();
    assert_eq!(sql, "SELECT 'it''s', 1 AS `one`");
}

#[test]
fn test_select_from_subquery() {
    let inner = Select::new()
        .column_as(raw_sql("count(*)"), "n")
        .from_table("scores");
    let sql = Select::new()
        .column("n")
        .from_subquery(inner, "s")
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT `n` FROM (SELECT count(*) AS `n` FROM `scores`) AS `s`"
    );
}

#[test]
fn test_select_invalid_subquery_fails() {
    let inner = Select::new().from_table("scores").offset(1);
    assert!(Select::new().from_subquery(inner, "s").build().is_err());
}

#[test]
fn test_order_by_raw_expression() {
    let sql = Select::new()
        .from_table("questions")
        .order_by(raw_sql("random()"))
        .order_by("position")
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `questions` ORDER BY random(), `position`"
    );
}

#[test]
fn test_join_requires_exactly_one_constraint() {
    assert!(Join::inner("a").build().is_err());
    assert!(Join::left("a").on("x = y").using(["id"]).build().is_err());
    assert!(Join::cross("a").on("x = y").build().is_err());
    assert!(Join::cross("a").using(["id"]).build().is_err());

    assert_eq!(
        Join::inner("a").using(["id", "k"]).build().unwrap(),
        "INNER JOIN `a` USING (`id`, `k`)"
    );
    assert_eq!(Join::cross("b").build().unwrap(), "CROSS JOIN `b`");
}

#[test]
fn test_select_with_invalid_join_fails() {
    let result = Select::new()
        .from_table("q")
        .join(Join::left("a"))
        .build();
    assert!(result.unwrap_err().is_contract_violation());
}

#[test]
fn test_insert_multi_row() {
    let sql = Insert::new("t")
        .values("a", [1i64, 2])
        .values("b", ["x", "y"])
        .values("c", [raw_sql(":c1"), raw_sql(":c2")])
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO `t` (`a`, `b`, `c`) VALUES (1, 'x', :c1), (2, 'y', :c2)"
    );
}

#[test]
fn test_insert_mismatched_lengths_fail() {
    let err = Insert::new("t")
        .values("a", [1i64, 2])
        .value("b", "x")
        .build()
        .unwrap_err();
    assert!(err.is_contract_violation());
    assert!(err.to_string().contains("column b has 1 values"));
}

#[test]
fn test_insert_without_rows_fails() {
    assert!(
        Insert::new("t")
            .values("a", Vec::<i64>::new())
            .build()
            .is_err()
    );
}

#[test]
fn test_insert_default_values() {
    assert_eq!(
        Insert::new("t").build().unwrap(),
        "INSERT INTO `t` DEFAULT VALUES"
    );
}

#[test]
fn test_insert_conflict_and_returning() {
    let sql = Insert::new("t")
        .or_replace()
        .value("a", "x")
        .returning("id")
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT OR REPLACE INTO `t` (`a`) VALUES ('x') RETURNING `id`"
    );
}

#[test]
fn test_update_with_raw_expression() {
    let sql = Update::new("questions")
        .set("position", raw_sql("position + 1"))
        .where_("position >= :position")
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE `questions` SET `position` = position + 1 WHERE position >= :position"
    );
}

#[test]
fn test_update_requires_confirmation_without_where() {
    let err = Update::new("t").set("a", "x").build().unwrap_err();
    assert!(err.is_contract_violation());

    let sql = Update::new("t").set("a", "x").all_rows(true).build().unwrap();
    assert_eq!(sql, "UPDATE `t` SET `a` = 'x'");
}

#[test]
fn test_update_requires_values() {
    assert!(Update::new("t").where_("id = :id").build().is_err());
}

#[test]
fn test_update_conflict_and_returning() {
    let sql = Update::new("t")
        .or_ignore()
        .set("a", 1)
        .where_("id = :id")
        .returning_all()
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE OR IGNORE `t` SET `a` = 1 WHERE id = :id RETURNING *"
    );
}

#[test]
fn test_delete_requires_confirmation_without_where() {
    assert!(Delete::new("t").build().is_err());
    assert_eq!(
        Delete::new("t").all_rows(true).build().unwrap(),
        "DELETE FROM `t`"
    );
}

#[test]
fn test_delete_with_returning() {
    let sql = Delete::new("t")
        .where_("id = :id")
        .returning_as("id", "deleted_id")
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "DELETE FROM `t` WHERE id = :id RETURNING `id` AS `deleted_id`"
    );
}

#[test]
fn test_delete_offset_without_limit_fails_even_when_confirmed() {
    assert!(Delete::new("t").all_rows(true).offset(2).build().is_err());
}

#[test]
fn test_create_table() {
    let sql = CreateTable::new("answers")
        .if_not_exists(true)
        .column(Column::of::<i64>("id").constraint(ColumnConstraint::primary_autoincrement()))
        .column(Column::of::<String>("text").constraint(ColumnConstraint::not_null()))
        .column(
            Column::of::<i64>("question")
                .constraint(ColumnConstraint::references("questions", "id")),
        )
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE IF NOT EXISTS `answers` (`id` INTEGER PRIMARY KEY AUTOINCREMENT, \
         `text` TEXT NOT NULL, `question` INTEGER REFERENCES `questions` (`id`))"
    );
}

#[test]
fn test_create_table_with_key_and_options() {
    let sql = CreateTable::new("scores")
        .temporary(true)
        .column(Column::of::<String>("name"))
        .column(Column::of::<i64>("round"))
        .constraint(TableConstraint::primary_key(["name", "round"]))
        .option(TableOption::WithoutRowid)
        .option(TableOption::Strict)
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "CREATE TEMPORARY TABLE `scores` (`name` TEXT, `round` INTEGER, \
         PRIMARY KEY (`name`, `round`)) WITHOUT ROWID, STRICT"
    );
}

#[test]
fn test_create_table_requires_columns() {
    assert!(CreateTable::new("t").build().is_err());
}

#[test]
fn test_alter_table_actions() {
    assert!(AlterTable::new("a").build().is_err());
    assert_eq!(
        AlterTable::new("a").rename_to("b").build().unwrap(),
        "ALTER TABLE `a` RENAME TO `b`"
    );
    assert_eq!(
        AlterTable::new("a").rename_column("x", "y").build().unwrap(),
        "ALTER TABLE `a` RENAME COLUMN `x` TO `y`"
    );
    assert_eq!(
        AlterTable::new("a")
            .add_column(
                Column::of::<bool>("flag").constraint(ColumnConstraint::default_expr("0"))
            )
            .build()
            .unwrap(),
        "ALTER TABLE `a` ADD COLUMN `flag` INTEGER DEFAULT (0)"
    );
    assert_eq!(
        AlterTable::new("a").drop_column("x").build().unwrap(),
        "ALTER TABLE `a` DROP COLUMN `x`"
    );
}

#[test]
fn test_drop_table() {
    assert_eq!(DropTable::new("a").build().unwrap(), "DROP TABLE `a`");
    assert_eq!(
        DropTable::new("a").if_exists(true).build().unwrap(),
        "DROP TABLE IF EXISTS `a`"
    );
}
