use crate::foundation::{
    core::{PixelRect, SurfaceSize},
    error::{PixelSlideError, PixelSlideResult},
    math::RandomSource,
};

/// How a revealed block paints its share of the next image.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum BlockVariant {
    /// Straight 1:1 copy.
    Plain,
    /// Content inset on the trailing edges plus a light outline.
    Bordered,
    /// Content rotated about the block center with run progress.
    Rotated,
}

impl BlockVariant {
    pub const ALL: [Self; 3] = [Self::Plain, Self::Bordered, Self::Rotated];

    pub fn index(self) -> usize {
        match self {
            Self::Plain => 0,
            Self::Bordered => 1,
            Self::Rotated => 2,
        }
    }

    /// Uniform pick among [`BlockVariant::ALL`].
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.next_index(Self::ALL.len())]
    }
}

/// One cell of the reveal grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub col: u32,
    pub row: u32,
    /// Surface-space rectangle, clipped at the right/bottom edges.
    pub rect: PixelRect,
    pub variant: BlockVariant,
}

impl Block {
    /// Index of the anti-diagonal the block sits on.
    pub fn diagonal(&self) -> u32 {
        self.col + self.row
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDims {
    pub cols: u32,
    pub rows: u32,
}

impl GridDims {
    pub fn total(self) -> usize {
        (self.cols as usize) * (self.rows as usize)
    }
}

/// `ceil(W / block) x ceil(H / block)`.
pub fn grid_dims(size: SurfaceSize, block_size: u32) -> GridDims {
    let block_size = block_size.max(1);
    GridDims {
        cols: size.width.div_ceil(block_size),
        rows: size.height.div_ceil(block_size),
    }
}

/// Number of blocks showing the next image at `progress` (clamped to `[0, 1]`).
pub fn reveal_count(total: usize, progress: f64) -> usize {
    if progress.is_nan() {
        return 0;
    }
    let p = progress.clamp(0.0, 1.0);
    ((total as f64 * p).floor() as usize).min(total)
}

/// Every block of a surface in the fixed order they are revealed.
#[derive(Clone, Debug)]
pub struct RevealPlan {
    size: SurfaceSize,
    block_size: u32,
    grid: GridDims,
    order: Vec<Block>,
}

impl RevealPlan {
    /// Partition `size` into blocks, give each a random variant and fix the reveal order.
    ///
    /// Blocks are grouped by variant. Within a group each block's ordering key is its
    /// anti-diagonal with probability `diagonal_bias` and noise otherwise, so groups sweep
    /// roughly from the top-left corner without being strictly ordered.
    #[tracing::instrument(level = "debug", skip(rng))]
    pub fn build<R: RandomSource + ?Sized>(
        size: SurfaceSize,
        block_size: u32,
        diagonal_bias: f64,
        rng: &mut R,
    ) -> PixelSlideResult<Self> {
        if size.is_empty() {
            return Err(PixelSlideError::surface_unavailable(format!(
                "cannot plan a reveal on a {}x{} surface",
                size.width, size.height
            )));
        }
        if block_size == 0 {
            return Err(PixelSlideError::validation("block_size must be > 0"));
        }
        let bias = if diagonal_bias.is_finite() {
            diagonal_bias.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let grid = grid_dims(size, block_size);
        let max_diagonal = f64::from(grid.cols + grid.rows - 2);

        let mut keyed = Vec::with_capacity(grid.total());
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let rect =
                    PixelRect::new(col * block_size, row * block_size, block_size, block_size)
                        .clip_to(size);
                let block = Block {
                    col,
                    row,
                    rect,
                    variant: BlockVariant::random(rng),
                };
                let key = if rng.chance(bias) {
                    f64::from(block.diagonal())
                } else {
                    rng.next_f64_01() * max_diagonal
                };
                keyed.push((block, key));
            }
        }

        keyed.sort_by(|(a, ka), (b, kb)| {
            a.variant
                .index()
                .cmp(&b.variant.index())
                .then(ka.total_cmp(kb))
        });

        let order: Vec<Block> = keyed.into_iter().map(|(block, _)| block).collect();
        tracing::debug!(
            cols = grid.cols,
            rows = grid.rows,
            blocks = order.len(),
            "reveal plan built"
        );

        Ok(Self {
            size,
            block_size,
            grid,
            order,
        })
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn grid(&self) -> GridDims {
        self.grid
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All blocks, in reveal order.
    pub fn blocks(&self) -> &[Block] {
        &self.order
    }

    /// The prefix of the reveal order visible at `progress`.
    pub fn revealed(&self, progress: f64) -> &[Block] {
        &self.order[..reveal_count(self.order.len(), progress)]
    }

    /// Block count per variant, indexed by [`BlockVariant::index`].
    pub fn variant_counts(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for block in &self.order {
            counts[block.variant.index()] += 1;
        }
        counts
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/plan.rs"]
mod tests;
