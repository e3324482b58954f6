//! End-to-end battery checks against mock devices on the loopback interface.

#[cfg(test)]
mod device;
#[cfg(test)]
mod scan;
