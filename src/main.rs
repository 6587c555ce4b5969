use intersection_sim::{
    ConsoleRenderer, Geometry, RenderFrame, Renderer, SignalTimings, Simulation, Snapshot,
    DEFAULT_SIM_TIME, FRAMES_PER_SECOND,
};
use log::info;
use std::path::Path;

const DEFAULT_SNAPSHOT: &str = "detected_vehicles.json";

fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SNAPSHOT.to_owned());
    let snapshot = Snapshot::load_or_empty(Path::new(&path));

    let mut sim = Simulation::new(SignalTimings::default(), Geometry::default(), DEFAULT_SIM_TIME);
    let seeded = sim.world_mut().seed_from_snapshot(&snapshot);
    info!("seeded {seeded} vehicles from {path}");

    let mut renderer = ConsoleRenderer::default();
    while !sim.done() {
        sim.step();
        if sim.frame() % FRAMES_PER_SECOND == 0 {
            renderer.present(&RenderFrame::capture(sim.world(), sim.elapsed()));
        }
    }

    let summary = sim.summary();
    println!("--- SIMULATION ENDED ---");
    println!("Lane-wise vehicle counts");
    for (index, count) in summary.crossed.iter().enumerate() {
        let direction = intersection_sim::Direction::from_index(index).unwrap();
        println!("Lane {} ({}): {}", index + 1, direction.name(), count);
    }
    println!("Total vehicles passed: {}", summary.total);
    println!("Total time passed: {}", summary.elapsed);
    println!("Vehicles per unit time: {:.2}", summary.per_second);
}
