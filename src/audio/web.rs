//! Web Audio tone sink
//!
//! Oscillator → envelope gain → master gain → lowpass → destination.

use web_sys::{
    AudioContext, BiquadFilterNode, BiquadFilterType, GainNode, OscillatorNode, OscillatorType,
};

use super::{Tone, ToneSink, Waveform};

/// Lowpass cutoff softening every tone
const LOWPASS_HZ: f32 = 800.0;

struct Graph {
    ctx: AudioContext,
    master: GainNode,
    // Kept alive with the graph
    _filter: BiquadFilterNode,
}

pub struct WebAudioSink {
    graph: Option<Graph>,
}

impl WebAudioSink {
    pub fn new(master_volume: f32) -> Self {
        // May fail outside a secure context
        let graph = Self::build(master_volume.clamp(0.0, 1.0));
        if graph.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { graph }
    }

    fn build(master_volume: f32) -> Option<Graph> {
        let ctx = AudioContext::new().ok()?;
        let master = ctx.create_gain().ok()?;
        master.gain().set_value(master_volume);
        let filter = ctx.create_biquad_filter().ok()?;
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value(LOWPASS_HZ);
        master.connect_with_audio_node(&filter).ok()?;
        filter.connect_with_audio_node(&ctx.destination()).ok()?;
        Some(Graph {
            ctx,
            master,
            _filter: filter,
        })
    }

    /// Create an oscillator routed through its own envelope gain
    fn create_osc(graph: &Graph, tone: &Tone) -> Option<(OscillatorNode, GainNode)> {
        let osc = graph.ctx.create_oscillator().ok()?;
        let gain = graph.ctx.create_gain().ok()?;

        osc.set_type(match tone.waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Triangle => OscillatorType::Triangle,
        });
        osc.frequency().set_value(tone.freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&graph.master).ok()?;

        Some((osc, gain))
    }
}

impl ToneSink for WebAudioSink {
    fn play(&mut self, tone: &Tone) {
        let Some(graph) = &self.graph else { return };
        let Some((osc, gain)) = Self::create_osc(graph, tone) else {
            return;
        };
        let t = graph.ctx.current_time() + tone.delay;

        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(tone.volume, t + 0.05)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + tone.duration)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + tone.duration).ok();
    }

    /// Resume audio context (required after user gesture)
    fn resume(&mut self) {
        if let Some(graph) = &self.graph {
            if graph.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = graph.ctx.resume();
            }
        }
    }
}
