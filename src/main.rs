fn main() {
    equipment_visualizer::run();
}
