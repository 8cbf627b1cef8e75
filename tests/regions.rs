use image_slicer::geometry::VerticalLine;
use image_slicer::slicing::{compute_regions, SliceRegion};
use image_slicer::{ImageDimensions, SliceLines};

fn region(x: f32, y: f32, width: f32, height: f32) -> SliceRegion {
    SliceRegion { x, y, width, height }
}

#[test]
fn test_one_row_split_two_full_height_columns() {
    let dims = ImageDimensions::new(400.0, 300.0);
    let lines = SliceLines {
        horizontal: vec![100.0],
        vertical: vec![
            VerticalLine::new(100.0, (0.0, 300.0)),
            VerticalLine::new(200.0, (0.0, 300.0)),
        ],
    };

    let regions = compute_regions(&lines, dims, 10.0);
    assert_eq!(
        regions,
        vec![
            region(0.0, 0.0, 100.0, 100.0),
            region(100.0, 0.0, 100.0, 100.0),
            region(200.0, 0.0, 200.0, 100.0),
            region(0.0, 100.0, 100.0, 200.0),
            region(100.0, 100.0, 100.0, 200.0),
            region(200.0, 100.0, 200.0, 200.0),
        ]
    );
}

#[test]
fn test_count_is_rows_times_columns() {
    let dims = ImageDimensions::new(1000.0, 800.0);
    let horizontal = vec![200.0, 400.0, 600.0];
    let vertical = [250.0, 500.0]
        .iter()
        .map(|x| VerticalLine::new(*x, (0.0, 800.0)))
        .collect();
    let lines = SliceLines { horizontal, vertical };

    assert_eq!(compute_regions(&lines, dims, 10.0).len(), (3 + 1) * (2 + 1));
}

#[test]
fn test_regions_tile_the_canvas() {
    let dims = ImageDimensions::new(640.0, 480.0);
    let lines = SliceLines {
        horizontal: vec![120.0, 300.0],
        vertical: vec![
            VerticalLine::new(200.0, (0.0, 120.0)),
            VerticalLine::new(50.0, (120.0, 300.0)),
            VerticalLine::new(400.0, (120.0, 300.0)),
            VerticalLine::new(320.0, (300.0, 480.0)),
        ],
    };

    let regions = compute_regions(&lines, dims, 10.0);
    assert_eq!(regions.len(), 2 + 3 + 2);
    let total: f32 = regions.iter().map(|r| r.area()).sum();
    assert!((total - dims.area()).abs() < 0.01);
}

#[test]
fn test_thin_slivers_are_skipped() {
    let dims = ImageDimensions::new(400.0, 300.0);
    let lines = SliceLines {
        horizontal: vec![100.0, 105.0],
        vertical: vec![],
    };

    let regions = compute_regions(&lines, dims, 10.0);
    assert_eq!(regions.len(), 2);
    let kept: f32 = regions.iter().map(|r| r.area()).sum();
    let sliver = 5.0 * 400.0;
    assert!((kept + sliver - dims.area()).abs() < 0.01);
}

#[test]
fn test_vertical_line_cuts_only_its_row() {
    let dims = ImageDimensions::new(400.0, 300.0);
    let lines = SliceLines {
        horizontal: vec![150.0],
        vertical: vec![VerticalLine::new(200.0, (150.0, 300.0))],
    };

    let regions = compute_regions(&lines, dims, 10.0);
    assert_eq!(
        regions,
        vec![
            region(0.0, 0.0, 400.0, 150.0),
            region(0.0, 150.0, 200.0, 150.0),
            region(200.0, 150.0, 200.0, 150.0),
        ]
    );
}

#[test]
fn test_stale_bounds_still_cut_overlapped_rows() {
    let dims = ImageDimensions::new(400.0, 300.0);
    // Bounds cover both rows even though a horizontal line now splits them.
    let lines = SliceLines {
        horizontal: vec![100.0],
        vertical: vec![VerticalLine::new(200.0, (0.0, 300.0))],
    };

    assert_eq!(compute_regions(&lines, dims, 10.0).len(), 4);
}

#[test]
fn test_empty_geometry_is_whole_image() {
    let dims = ImageDimensions::new(400.0, 300.0);
    assert_eq!(
        compute_regions(&SliceLines::new(), dims, 10.0),
        vec![region(0.0, 0.0, 400.0, 300.0)]
    );
}
