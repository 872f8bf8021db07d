pub mod net;
pub mod power;
pub mod queue;
pub mod sim;
pub mod topo;

#[cfg(test)]
mod test;
