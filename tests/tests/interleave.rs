//! Parent and child tables, with and without an index on the child.

use mutcount_tests::prelude::*;

/// A child row whose indexed column is populated.
fn indexed_child(schema: &Schema, plain: usize) -> RowShape {
    shape_of(schema, CHILD_WITH_INDEX, plain).set("With_Index1", "")
}

mod row_model {
    use super::*;

    #[tokio::test]
    async fn test_pair_inserts() {
        // GIVEN
        let (harness, _store) = memory_harness(HarnessConfig::default(), 20_000).unwrap();
        let schema = harness.oracle().schema().clone();

        // WHEN / THEN
        Scenario::new("pair_insert")
            .table(CHILD)
            .shape(shape_of(&schema, CHILD, 6))
            .pairs_with(shape_of(&schema, PARENT, 7))
            .expect_unit_cost(2)
            .expect_units(10_000, 10_001)
            .run(&harness)
            .await
            .unwrap();
        Scenario::new("pair_insert_with_index")
            .table(CHILD_WITH_INDEX)
            .shape(shape_of(&schema, CHILD_WITH_INDEX, 5))
            .pairs_with(shape_of(&schema, PARENT_WITH_INDEX, 7))
            .expect_unit_cost(3)
            .expect_units(6_666, 6_667)
            .run(&harness)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cascading_delete_counts_child_rows() {
        // GIVEN
        let (harness, store) = memory_harness(HarnessConfig::default(), 20_000).unwrap();
        let schema = harness.oracle().schema().clone();

        // WHEN parents are deleted with one child each
        let verdicts = Scenario::new("pair_delete")
            .table(CHILD)
            .delete()
            .shape(RowShape::new())
            .pairs_with(RowShape::new())
            .expect_unit_cost(2)
            .expect_units(10_000, 10_001)
            .run(&harness)
            .await
            .unwrap();

        // THEN the accepted delete removed its children, the rejected one nothing
        assert_eq!(verdicts[1].outcome, Outcome::RejectedForLimit);
        assert_eq!(store.row_count(PARENT).await, 10_001);
        assert_eq!(store.row_count(CHILD).await, 10_001);

        Scenario::new("pair_delete_with_index")
            .table(CHILD_WITH_INDEX)
            .delete()
            .shape(indexed_child(&schema, 0))
            .pairs_with(RowShape::new())
            .expect_unit_cost(3)
            .expect_units(6_666, 6_667)
            .run(&harness)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_child_index_entry_counts_with_null_key() {
        // GIVEN a child index that is not NULL-filtered
        let (harness, _store) = memory_harness(HarnessConfig::minimal(), 10).unwrap();

        // WHEN / THEN parent, child row and its NULL-keyed entry
        Scenario::new("pair_delete_null_index")
            .table(CHILD_WITH_INDEX)
            .delete()
            .shape(RowShape::new().null("With_Index1"))
            .pairs_with(RowShape::new())
            .expect_unit_cost(3)
            .expect_units(3, 4)
            .run(&harness)
            .await
            .unwrap();
    }
}

mod cell_model {
    use super::*;

    #[tokio::test]
    async fn test_pair_inserts_cost_twenty() {
        // GIVEN
        let (harness, _store) = memory_harness(HarnessConfig::legacy_cells(), 20_000).unwrap();
        let schema = harness.oracle().schema().clone();

        // WHEN / THEN ten cells for the parent and ten for the child
        Scenario::new("cells_pair_insert")
            .table(CHILD)
            .shape(shape_of(&schema, CHILD, 6))
            .pairs_with(shape_of(&schema, PARENT, 7))
            .expect_unit_cost(20)
            .expect_units(1000, 1001)
            .run(&harness)
            .await
            .unwrap();
        Scenario::new("cells_pair_insert_with_index")
            .table(CHILD_WITH_INDEX)
            .shape(shape_of(&schema, CHILD_WITH_INDEX, 5))
            .pairs_with(shape_of(&schema, PARENT_WITH_INDEX, 7))
            .expect_unit_cost(20)
            .expect_units(1000, 1001)
            .run(&harness)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cascading_delete_counts_only_child_indexes() {
        let (harness, _store) = memory_harness(HarnessConfig::legacy_cells(), 20_000).unwrap();
        let schema = harness.oracle().schema().clone();

        Scenario::new("cells_pair_delete")
            .table(CHILD)
            .delete()
            .pairs_with(RowShape::new())
            .expect_unit_cost(1)
            .expect_units(20_000, 20_001)
            .run(&harness)
            .await
            .unwrap();
        Scenario::new("cells_pair_delete_with_index")
            .table(CHILD_WITH_INDEX)
            .delete()
            .shape(indexed_child(&schema, 0))
            .pairs_with(RowShape::new())
            .expect_unit_cost(2)
            .expect_units(10_000, 10_001)
            .run(&harness)
            .await
            .unwrap();
    }
}
