fn main() -> anyhow::Result<()> {
    moodscan_lib::run()
}
