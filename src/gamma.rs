//! Gamma remapping of raw antialiasing coverage.

/// Precomputed 256-entry brightness curve.
///
/// Every rasterization path pushes engine coverage through this table before
/// the value is used as an alpha.
#[derive(Debug, Clone)]
pub struct GammaTable {
    table: [u8; 256],
}

impl GammaTable {
    pub fn new(gamma: f32) -> Self {
        let gamma = f64::from(gamma);
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            let v = (i as f64 / 255.0).powf(gamma) * 255.0;
            *entry = v.round().clamp(0.0, 255.0) as u8;
        }
        Self { table }
    }

    #[inline]
    pub fn map(&self, coverage: u8) -> u8 {
        self.table[coverage as usize]
    }

    pub fn as_slice(&self) -> &[u8; 256] {
        &self.table
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        GammaTable::new(1.0)
    }
}
