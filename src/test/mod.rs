mod delay;
mod simulator;
mod switch_routing;
