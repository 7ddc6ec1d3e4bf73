// Adapters: translate outside request shapes into engine calls.

pub mod http;
