use crate::image_pipeline::gaps::mask::{BinaryMask, CANOPY};

/// 8-connected neighbour offsets (dx, dy).
pub const NEIGHBORHOOD: [(isize, isize); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Region label of every pixel plus the area of each region.
///
/// Labels are assigned in row-major order of each region's first pixel,
/// so the result is fully determined by the mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLabels {
    labels: Vec<Option<u32>>,
    areas: Vec<usize>,
}

impl RegionLabels {
    pub fn labels(&self) -> &[Option<u32>] {
        &self.labels
    }

    /// Pixel count of each region, indexed by label
    pub fn areas(&self) -> &[usize] {
        &self.areas
    }

    pub fn region_count(&self) -> usize {
        self.areas.len()
    }
}

/// Labels the 8-connected regions of non-canopy pixels.
pub fn label_regions(mask: &BinaryMask) -> RegionLabels {
    let (width, height) = (mask.width, mask.height);
    let data = mask.data();
    let mut labels: Vec<Option<u32>> = vec![None; data.len()];
    let mut areas = Vec::new();
    let mut stack = Vec::new();

    for start in 0..data.len() {
        if data[start] == CANOPY || labels[start].is_some() {
            continue;
        }

        let label = areas.len() as u32;
        let mut area = 0usize;
        labels[start] = Some(label);
        stack.push(start);

        while let Some(pos) = stack.pop() {
            area += 1;
            let (x, y) = ((pos % width) as isize, (pos / width) as isize);
            for (dx, dy) in NEIGHBORHOOD {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let npos = ny as usize * width + nx as usize;
                if data[npos] != CANOPY && labels[npos].is_none() {
                    labels[npos] = Some(label);
                    stack.push(npos);
                }
            }
        }

        areas.push(area);
    }

    RegionLabels { labels, areas }
}
