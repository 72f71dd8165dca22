//! Placement of feature instances on the main window grid.

use std::collections::HashMap;

use log::debug;

use crate::error::{DeskClockError, Result};
use crate::feature::{FeatureInstance, Position, dominance_sort};
use crate::tui::{Element, LayoutConstraint};
use crate::tui::element::{ColumnBuilder, RowBuilder};

/// One cell of a placed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Index into [`GridLayout::instances`]
    Feature(usize),
    /// Column left blank before a later feature in the same row
    Gap,
}

/// Stateless grid builder.
#[derive(Debug, Default, Clone, Copy)]
pub struct GridLayoutEngine;

impl GridLayoutEngine {
    /// Sort instances into dispatch order and derive the grid from their
    /// positions. Two instances on the same cell fail the whole build.
    pub fn arrange(&self, mut instances: Vec<FeatureInstance>) -> Result<GridLayout> {
        let mut occupied: HashMap<Position, usize> = HashMap::new();
        for instance in &instances {
            *occupied.entry(instance.position()).or_default() += 1;
        }
        if let Some(instance) = instances
            .iter()
            .find(|instance| occupied[&instance.position()] > 1)
        {
            let position = instance.position();
            return Err(DeskClockError::Layout {
                position,
                count: occupied[&position],
            });
        }

        dominance_sort(&mut instances, |instance| instance.position());

        let rows = instances
            .iter()
            .map(|instance| instance.position().row + 1)
            .max()
            .unwrap_or(0);
        let cols = instances
            .iter()
            .map(|instance| instance.position().col + 1)
            .max()
            .unwrap_or(0);

        let mut placement: Vec<Vec<(usize, usize)>> = vec![Vec::new(); rows];
        for (index, instance) in instances.iter().enumerate() {
            let position = instance.position();
            placement[position.row].push((position.col, index));
        }

        let placement = placement
            .into_iter()
            .map(|mut row| {
                row.sort_by_key(|(col, _)| *col);
                let mut cells = Vec::with_capacity(row.len());
                let mut next_col = 0;
                for (col, index) in row {
                    cells.extend(std::iter::repeat(Cell::Gap).take(col - next_col));
                    cells.push(Cell::Feature(index));
                    next_col = col + 1;
                }
                if cells.is_empty() {
                    cells.push(Cell::Gap);
                }
                cells
            })
            .collect();

        debug!(
            "Arranged {} features on a {}x{} grid",
            instances.len(),
            rows,
            cols
        );

        Ok(GridLayout {
            instances,
            placement,
            rows,
            cols,
        })
    }
}

/// Instances in dispatch order together with their row-major placement.
#[derive(Debug)]
pub struct GridLayout {
    instances: Vec<FeatureInstance>,
    placement: Vec<Vec<Cell>>,
    rows: usize,
    cols: usize,
}

impl GridLayout {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn instances(&self) -> &[FeatureInstance] {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut [FeatureInstance] {
        &mut self.instances
    }

    /// One entry per grid row, ending at each row's last feature.
    pub fn placement(&self) -> &[Vec<Cell>] {
        &self.placement
    }

    /// Visual fragments per row.
    pub fn fragments(&self) -> Vec<Vec<Element>> {
        self.placement
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Feature(index) => self.instances[*index].fragment(),
                        Cell::Gap => Element::Spacer,
                    })
                    .collect()
            })
            .collect()
    }

    /// Feature rows followed by the trailing control row.
    pub fn view(&self, controls: Element) -> Element {
        let mut column = ColumnBuilder::new();
        for row in self.fragments() {
            let mut builder = RowBuilder::new().spacing(2);
            for fragment in row {
                builder = builder.add(fragment, LayoutConstraint::Fill(1));
            }
            column = column.add(builder.build(), LayoutConstraint::Fill(1));
        }
        column.add(controls, LayoutConstraint::Length(3)).build()
    }
}
