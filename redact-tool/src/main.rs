fn main() -> eframe::Result {
    redact_tool::run_native()
}
