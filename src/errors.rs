use error_chain::error_chain;

error_chain! {
    errors {
        /// Malformed blockwise maze text rejected before any grid is built.
        BlockwiseFormat(msg: String) {
            description("invalid blockwise maze text")
            display("invalid blockwise maze text: {}", msg)
        }
        /// A maze generation algorithm that is deliberately not implemented.
        /// It fails loudly rather than silently doing nothing.
        UnsupportedGenerator(name: String) {
            description("unsupported maze generator")
            display("the {} maze generator is not supported", name)
        }
    }
}
