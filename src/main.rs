fn main() {
    natded::bin::cli()
}
