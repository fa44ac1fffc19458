use indexmap::IndexMap;

use crate::error::TransformError;
use crate::index::AxisIndexes;
use crate::model::{cell_at, CategoriesAndSeries, Column, DataPoint, Row, Series};
use crate::normalize::{group_key, measure_value};

/// One node of the aggregation tree. Nodes live in an arena vector and link
/// to children by index, so flattening needs no recursion.
#[derive(Debug)]
struct GroupNode {
    label: String,
    weight: f64,
    /// Child arena indices keyed by group value, in first-appearance order
    /// within this parent's row subset.
    children: IndexMap<String, usize>,
}

impl GroupNode {
    fn new(label: String) -> Self {
        Self {
            label,
            weight: 0.0,
            children: IndexMap::new(),
        }
    }
}

/// Build the proportional (pie/donut-like) result: a group-and-sum tree over
/// the axis column plus the full split-by chain, flattened into one series
/// per aggregation depth. Axis and split columns are treated as discrete
/// grouping keys regardless of declared type, and only the first measure is
/// consumed.
pub fn hierarchical_series(
    rows: &[Row],
    columns: &[Column],
    idx: &AxisIndexes,
) -> Result<CategoriesAndSeries, TransformError> {
    let Some(&measure_idx) = idx.y_axes.first() else {
        return Ok(CategoriesAndSeries::empty());
    };

    // The aggregation chain: axis first, then each split-by column.
    let levels: Vec<usize> = std::iter::once(idx.x_axis)
        .chain(idx.split_by.iter().copied())
        .collect();

    // Single pass: each row adds its measure to every node along its path,
    // creating nodes on first sight. Index 0 is the synthetic root.
    let mut arena: Vec<GroupNode> = vec![GroupNode::new(String::new())];
    for row in rows {
        let value = measure_value(cell_at(row, measure_idx)).unwrap_or(0.0);
        let mut current = 0;
        for &column_idx in &levels {
            let key = group_key(cell_at(row, column_idx));
            let child = match arena[current].children.get(&key).copied() {
                Some(child) => child,
                None => {
                    let child = arena.len();
                    arena.push(GroupNode::new(key.clone()));
                    arena[current].children.insert(key, child);
                    child
                }
            };
            arena[child].weight += value;
            current = child;
        }
    }

    // Depth-first flattening, parent before children, siblings in
    // first-appearance order. Collecting per depth groups each level's
    // entries by their ancestor chain.
    let mut per_depth: Vec<Vec<DataPoint>> = vec![Vec::new(); levels.len()];
    let mut stack: Vec<(usize, usize)> = arena[0]
        .children
        .values()
        .rev()
        .map(|&node| (node, 0))
        .collect();
    while let Some((node_idx, depth)) = stack.pop() {
        let node = &arena[node_idx];
        per_depth[depth].push(DataPoint::Slice {
            name: node.label.clone(),
            y: node.weight,
        });
        for &child in node.children.values().rev() {
            stack.push((child, depth + 1));
        }
    }

    let series = levels
        .iter()
        .zip(per_depth)
        .map(|(&column_idx, data)| Series {
            name: columns[column_idx].name.clone(),
            data,
        })
        .collect();

    Ok(CategoriesAndSeries {
        series,
        categories: None,
    })
}
