use crate::constants::{AMBIENT_AUDIO_URL, TRACK_AUDIO_URL};
use flock_core::constants::{ANALYSER_SMOOTHING, AMBIENT_VOLUME_MIN, FFT_SIZE, MAX_DB, MIN_DB};
use flock_core::{AnalyserInput, AudioGraphState, FlockEngine, PlaybackClock};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

const UNLOCK_EVENTS: [&str; 2] = ["pointerdown", "keydown"];

/// The two streamed sources: the looping ambient bed and the analysed track.
#[derive(Clone)]
pub struct AudioRig {
    pub track: web::HtmlAudioElement,
    pub ambient: web::HtmlAudioElement,
    pub graph: Rc<RefCell<AnalysisGraph>>,
}

struct GraphNodes {
    ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    // kept alive with the graph
    _source: web::MediaElementAudioSourceNode,
}

/// Track -> analyser -> destination, built lazily on the first play request.
#[derive(Default)]
pub struct AnalysisGraph {
    state: AudioGraphState,
    nodes: Option<GraphNodes>,
    freq_db: Vec<f32>,
    time_domain: Vec<f32>,
}

impl AnalysisGraph {
    pub fn state(&self) -> AudioGraphState {
        self.state
    }

    /// Pull this frame's spectrum and waveform out of the analyser.
    pub fn capture(&mut self) -> Option<AnalyserInput<'_>> {
        let nodes = self.nodes.as_ref()?;
        if !self.state.is_ready() {
            return None;
        }
        nodes.analyser.get_float_frequency_data(&mut self.freq_db);
        nodes
            .analyser
            .get_float_time_domain_data(&mut self.time_domain);
        Some(AnalyserInput {
            time_domain: &self.time_domain,
            freq_db: &self.freq_db,
        })
    }

    fn context(&self) -> Option<web::AudioContext> {
        self.nodes.as_ref().map(|n| n.ctx.clone())
    }
}

fn create_element(url: &str, looping: bool, volume: f64) -> anyhow::Result<web::HtmlAudioElement> {
    let el = web::HtmlAudioElement::new_with_src(url).map_err(|e| anyhow::anyhow!("{:?}", e))?;
    el.set_loop(looping);
    el.set_preload("auto");
    el.set_volume(volume);
    Ok(el)
}

pub fn create_audio_rig() -> anyhow::Result<AudioRig> {
    let ambient = create_element(AMBIENT_AUDIO_URL, true, AMBIENT_VOLUME_MIN as f64)?;
    let track = create_element(TRACK_AUDIO_URL, false, 1.0)?;
    Ok(AudioRig {
        track,
        ambient,
        graph: Rc::new(RefCell::new(AnalysisGraph::default())),
    })
}

async fn play_element(el: &web::HtmlMediaElement) -> Result<(), JsValue> {
    JsFuture::from(el.play()?).await.map(|_| ())
}

/// Start the ambient loop, falling back to a first-interaction unlock when
/// autoplay is blocked.
pub fn start_ambient(rig: &AudioRig) {
    let ambient = rig.ambient.clone();
    spawn_local(async move {
        if let Err(e) = play_element(&ambient).await {
            log::info!("[audio] ambient autoplay blocked: {:?}", e);
            arm_ambient_unlock(ambient);
        }
    });
}

fn arm_ambient_unlock(ambient: web::HtmlAudioElement) {
    let Some(window) = web::window() else {
        return;
    };
    let handle: Rc<RefCell<Option<js_sys::Function>>> = Rc::new(RefCell::new(None));
    let handle_cb = handle.clone();
    let closure = Closure::wrap(Box::new(move || {
        let ambient = ambient.clone();
        let handle = handle_cb.clone();
        spawn_local(async move {
            // listeners stay until a play attempt succeeds
            if play_element(&ambient).await.is_err() {
                return;
            }
            let Some(func) = handle.borrow_mut().take() else {
                return;
            };
            if let Some(w) = web::window() {
                for ev in UNLOCK_EVENTS {
                    _ = w.remove_event_listener_with_callback(ev, &func);
                }
            }
        });
    }) as Box<dyn FnMut()>);
    let func: js_sys::Function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
    for ev in UNLOCK_EVENTS {
        _ = window.add_event_listener_with_callback(ev, &func);
    }
    *handle.borrow_mut() = Some(func);
    closure.forget();
}

fn build_nodes(track: &web::HtmlAudioElement) -> Result<GraphNodes, JsValue> {
    let ctx = web::AudioContext::new()?;
    let source = ctx.create_media_element_source(track)?;
    let analyser = ctx.create_analyser()?;
    analyser.set_fft_size(FFT_SIZE);
    analyser.set_smoothing_time_constant(ANALYSER_SMOOTHING as f64);
    analyser.set_min_decibels(MIN_DB as f64);
    analyser.set_max_decibels(MAX_DB as f64);
    source.connect_with_audio_node(&analyser)?;
    analyser.connect_with_audio_node(&ctx.destination())?;
    Ok(GraphNodes {
        ctx,
        analyser,
        _source: source,
    })
}

/// Build the analysis graph if nobody has yet, attaching the analyzer on
/// success. Resumes a suspended context either way.
pub async fn ensure_analysis_graph(rig: &AudioRig, engine: &Rc<RefCell<FlockEngine>>) {
    let claimed = rig.graph.borrow_mut().state.begin();
    if claimed {
        let mut graph = rig.graph.borrow_mut();
        match build_nodes(&rig.track) {
            Ok(nodes) => {
                let bins = nodes.analyser.frequency_bin_count() as usize;
                let sample_rate = nodes.ctx.sample_rate();
                graph.freq_db = vec![MIN_DB; bins];
                graph.time_domain = vec![0.0; FFT_SIZE as usize];
                graph.nodes = Some(nodes);
                graph.state.finish(true);
                engine.borrow_mut().attach_analyzer(sample_rate, bins);
            }
            Err(e) => {
                log::warn!("[audio] analysis graph unavailable: {:?}", e);
                graph.state.finish(false);
            }
        }
    }
    let ctx = rig.graph.borrow().context();
    if let Some(ctx) = ctx {
        if ctx.state() == web::AudioContextState::Suspended {
            if let Ok(p) = ctx.resume() {
                _ = JsFuture::from(p).await;
            }
        }
    }
}

/// Play the track through the analysis graph, optionally from the start.
pub async fn play_track(rig: AudioRig, engine: Rc<RefCell<FlockEngine>>, reset: bool) {
    ensure_analysis_graph(&rig, &engine).await;
    if reset {
        rig.track.set_current_time(0.0);
    }
    if let Err(e) = play_element(&rig.track).await {
        log::warn!("[audio] could not start {}: {:?}", TRACK_AUDIO_URL, e);
    }
}

/// Fire-and-forget wrapper for click and key handlers.
pub fn request_play(rig: &AudioRig, engine: &Rc<RefCell<FlockEngine>>, reset: bool) {
    spawn_local(play_track(rig.clone(), engine.clone(), reset));
}

#[inline]
pub fn track_clock(track: &web::HtmlAudioElement) -> PlaybackClock {
    PlaybackClock {
        position_sec: track.current_time(),
        playing: !track.paused() && !track.ended(),
    }
}

#[inline]
pub fn set_ambient_volume(rig: &AudioRig, volume: f32) {
    rig.ambient.set_volume(volume.clamp(0.0, 1.0) as f64);
}
