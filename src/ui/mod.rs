/// egui front-end: the plotting surface and the panels that paint it.
pub mod panels;
pub mod plot;
pub mod surface;
