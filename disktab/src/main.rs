fn main() -> anyhow::Result<()> {
    disktab::run()
}
