fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        // Headless development frontend: the runtime comes up against the
        // console hooks so the protocol flow is observable without a
        // rendering layer on top.
        let _shell = empirio::boot::run(empirio::UiHooks::console());
    }
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("empirio is a browser client; build it for wasm32 (e.g. trunk serve)");
}
