use std::fmt;

use serde::Serialize;

use crate::error::{Stage, SurfaceError, SurfaceResult};
use crate::geom::kernel;
use crate::surface::{BoundaryPolygon, ClassUnions, SurfaceClass, Tolerance};

/// Area of one class and its share of the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaRow {
    pub class: SurfaceClass,
    pub area_m2: f64,
    pub percentage: f64,
}

/// Exact (unrounded) area breakdown for one boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaReport {
    pub boundary_area_m2: f64,
    pub rows: [AreaRow; 4],
}

/// Measure each class against the boundary. Empty classes report 0 area and 0%.
pub fn report(boundary: &BoundaryPolygon, unions: &ClassUnions) -> SurfaceResult<AreaReport> {
    let boundary_area_m2 = boundary.area();
    if !(boundary_area_m2.is_finite() && boundary_area_m2 > 0.0) {
        return Err(SurfaceError::InvalidBoundary {
            stage: Stage::Account,
            reason: format!("boundary area is {boundary_area_m2}"),
        });
    }

    let rows = SurfaceClass::ALL.map(|class| {
        let area_m2 = kernel::area(unions.get(class));
        AreaRow { class, area_m2, percentage: 100.0 * area_m2 / boundary_area_m2 }
    });

    Ok(AreaReport { boundary_area_m2, rows })
}

impl AreaReport {
    /// The row for `class`.
    #[inline]
    pub fn get(&self, class: SurfaceClass) -> &AreaRow { &self.rows[class.index()] }

    /// Sum of class areas; equals the boundary area within tolerance.
    pub fn total_area(&self) -> f64 {
        self.rows.iter().map(|row| row.area_m2).sum()
    }

    /// Sum of class percentages; 100 within tolerance.
    pub fn total_percentage(&self) -> f64 {
        self.rows.iter().map(|row| row.percentage).sum()
    }

    /// Check that the class areas add back up to the boundary.
    pub fn is_conserved(&self, tolerance: &Tolerance) -> bool {
        tolerance.approx_eq(self.total_area(), self.boundary_area_m2, self.boundary_area_m2)
            && tolerance.approx_eq(self.total_percentage(), 100.0, 100.0)
    }
}

/// Format a non-negative value rounded to whole units with `,` thousands separators.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 { out.push('-') }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 { out.push(',') }
        out.push(ch);
    }
    out
}

impl fmt::Display for AreaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<28} {:>12} {:>15}", "Surface Type", "Area (m²)", "Percentage (%)")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<28} {:>12} {:>15}",
                row.class.label(),
                format_thousands(row.area_m2),
                format!("{:.1}%", row.percentage),
            )?;
        }
        Ok(())
    }
}
