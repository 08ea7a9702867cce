fn main() -> anyhow::Result<()> {
    ubench::run()
}
