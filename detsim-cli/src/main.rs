fn main() -> anyhow::Result<()> {
    detsim_cli::entrypoint()
}
