//! Test modules for the queue system
//!
//! Suites are organised by behaviour: routing and FIFO order, blocking and
//! backpressure, concurrent producers and consumers, shutdown, edge cases.

mod lifecycle;
